//! 测量
//!
//! `FlowMonitor` 按流累加收发计数；`collect_link_usage` 读取每条链路两个方向的计数器。
//! 结果在仿真跑到截止时间之后读取。

mod link_usage;
mod monitor;
mod stat;

pub use link_usage::{DirectionUsage, LinkUsage, collect_link_usage};
pub use monitor::FlowMonitor;
pub use stat::FlowStat;
