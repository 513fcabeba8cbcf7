//! DropTail（尾丢弃）队列
//!
//! 放不下新到达的 packet 就丢掉它；队列自己记录丢弃数与峰值占用。

use std::collections::VecDeque;

use crate::net::Packet;

use super::{PacketQueue, mem_from_pkt};

#[derive(Debug)]
pub struct DropTailQueue {
    limit: u64,
    held: u64,
    peak: u64,
    drops: u64,
    pkts: VecDeque<Packet>,
}

impl DropTailQueue {
    pub fn new(limit_bytes: u64) -> Self {
        Self {
            limit: limit_bytes,
            held: 0,
            peak: 0,
            drops: 0,
            pkts: VecDeque::new(),
        }
    }

    /// 容量按包数给出（每包 `DEFAULT_PKT_BYTES`）
    pub fn with_packets(pkts: u64) -> Self {
        Self::new(mem_from_pkt(pkts))
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet> {
        let held = self.held.saturating_add(u64::from(pkt.size_bytes));
        if held > self.limit {
            self.drops += 1;
            return Err(pkt);
        }
        self.held = held;
        self.peak = self.peak.max(held);
        self.pkts.push_back(pkt);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let pkt = self.pkts.pop_front()?;
        self.held -= u64::from(pkt.size_bytes);
        Some(pkt)
    }

    fn len(&self) -> usize {
        self.pkts.len()
    }

    fn bytes(&self) -> u64 {
        self.held
    }

    fn capacity_bytes(&self) -> u64 {
        self.limit
    }

    fn peak_bytes(&self) -> u64 {
        self.peak
    }

    fn drops(&self) -> u64 {
        self.drops
    }
}
