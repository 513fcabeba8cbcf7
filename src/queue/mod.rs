//! 队列策略（Queue disciplines）
//!
//! 每个单向信道有一个出口队列。默认容量为 `UNBOUNDED_BYTES`（不丢包）；
//! 给定包数时按 `DEFAULT_PKT_BYTES` 折算为字节容量。

use crate::net::Packet;

mod drop_tail;

pub use drop_tail::DropTailQueue;

pub const DEFAULT_PKT_BYTES: u64 = 1500;
pub const UNBOUNDED_BYTES: u64 = u64::MAX;

pub fn mem_from_pkt(pkts: u64) -> u64 {
    pkts.saturating_mul(DEFAULT_PKT_BYTES)
}

/// Packet 队列抽象
pub trait PacketQueue: std::fmt::Debug + Send {
    /// 入队：成功返回 Ok；若被丢弃则返回 Err(pkt)
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet>;
    /// 出队：按队列策略返回下一个 packet
    fn dequeue(&mut self) -> Option<Packet>;

    fn len(&self) -> usize;
    /// 当前排队字节数
    fn bytes(&self) -> u64;
    fn capacity_bytes(&self) -> u64;
    /// 曾经达到的最大排队字节数
    fn peak_bytes(&self) -> u64;
    /// 因容量不足被拒绝的 packet 数
    fn drops(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
