//! 单条流的累计统计

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::net::TransportKind;
use crate::sim::SimTime;
use crate::traffic::FlowClass;

/// 流统计。字节数为应用层载荷字节数。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowStat {
    pub class: FlowClass,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub dst_port: u16,
    pub transport: TransportKind,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub rx_packets: u64,
    /// 在某个队列被丢弃或无路由的 packet 数
    pub lost_packets: u64,
    pub start: SimTime,
    /// 停止时刻：截止时间，或合法流预算用完的时刻
    pub stop: SimTime,
    pub first_tx: Option<SimTime>,
    pub last_tx: Option<SimTime>,
    pub first_rx: Option<SimTime>,
    pub last_rx: Option<SimTime>,
    /// 所有已接收 packet 的端到端时延之和
    pub delay_sum: SimTime,
}

impl FlowStat {
    /// 平均端到端时延
    pub fn mean_delay(&self) -> Option<SimTime> {
        (self.rx_packets > 0).then(|| SimTime(self.delay_sum.0 / self.rx_packets))
    }

    /// 接收吞吐（bit/s），按首末接收时刻计算
    pub fn rx_throughput_bps(&self) -> f64 {
        match (self.first_rx, self.last_rx) {
            (Some(a), Some(b)) if b > a => self.rx_bytes as f64 * 8.0 / b.since(a).as_secs_f64(),
            _ => 0.0,
        }
    }
}
