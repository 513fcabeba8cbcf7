mod config;
mod data_rate;
mod queues;
mod sim_time;
mod simulator;
mod topology;
