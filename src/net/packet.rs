//! 数据包类型
//!
//! 数据包只携带路由与计量所需的字段；不实现任何传输层状态机。

use super::id::{FlowId, NodeId};
use crate::sim::SimTime;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// 点对点链路层头部（PPP）字节数
pub const PPP_HEADER_BYTES: u32 = 2;
/// IPv4 头部字节数
pub const IPV4_HEADER_BYTES: u32 = 20;

/// 传输层类型：仅用于端口匹配和线上头部开销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Udp,
    Tcp,
}

impl TransportKind {
    /// 传输层头部字节数
    pub fn header_bytes(self) -> u32 {
        match self {
            TransportKind::Udp => 8,
            TransportKind::Tcp => 20,
        }
    }

    /// 携带 `payload` 字节载荷时在链路上的总字节数
    pub fn wire_bytes(self, payload: u32) -> u32 {
        payload
            .saturating_add(self.header_bytes())
            .saturating_add(IPV4_HEADER_BYTES)
            .saturating_add(PPP_HEADER_BYTES)
    }
}

/// 一条流的端点五元组（源端口不建模）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowTuple {
    pub src: NodeId,
    pub dst: NodeId,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub dst_port: u16,
    pub transport: TransportKind,
}

/// 网络数据包
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub flow_id: FlowId,
    pub tuple: FlowTuple,
    /// 应用层载荷字节数（流统计按此计数）
    pub payload_bytes: u32,
    /// 链路上的总字节数（用于序列化时延与队列占用）
    pub size_bytes: u32,
    pub sent_at: SimTime,
    pub hops_taken: u32,
}

impl Packet {
    pub fn new(id: u64, flow_id: FlowId, tuple: FlowTuple, payload_bytes: u32, sent_at: SimTime) -> Self {
        Self {
            id,
            flow_id,
            tuple,
            payload_bytes,
            size_bytes: tuple.transport.wire_bytes(payload_bytes),
            sent_at,
            hops_taken: 0,
        }
    }

    pub fn src(&self) -> NodeId {
        self.tuple.src
    }

    pub fn dst(&self) -> NodeId {
        self.tuple.dst
    }

    /// 经过一跳
    pub fn advance(mut self) -> Self {
        self.hops_taken = self.hops_taken.saturating_add(1);
        self
    }
}
