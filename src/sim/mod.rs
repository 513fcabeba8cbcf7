//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件：仿真时间、事件、世界和仿真器。
//! 所有流量都以事件形式排在同一条时间线上，没有真实并发。

mod event;
mod scheduled_event;
mod simulator;
mod time;

pub use event::{Event, World};
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
