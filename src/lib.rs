pub mod addr;
pub mod error;
pub mod flowmon;
pub mod net;
pub mod queue;
pub mod scenario;
pub mod sim;
pub mod topo;
pub mod traffic;

#[cfg(test)]
mod test;
