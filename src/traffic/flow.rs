//! 流描述
//!
//! 编排阶段创建的不可变流记录；之后只被引用，不会重新调度或修改。

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::net::{DataRate, FlowId, FlowTuple, NodeId, TransportKind};
use crate::sim::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowClass {
    Attack,
    Legitimate,
}

/// 发送约束：恒定速率或总字节预算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowBudget {
    Rate(DataRate),
    Bytes(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficFlow {
    pub id: FlowId,
    pub class: FlowClass,
    pub src: NodeId,
    pub dst: NodeId,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub dst_port: u16,
    pub transport: TransportKind,
    pub budget: FlowBudget,
    pub start: SimTime,
    pub stop: SimTime,
}

impl TrafficFlow {
    pub fn tuple(&self) -> FlowTuple {
        FlowTuple {
            src: self.src,
            dst: self.dst,
            src_addr: self.src_addr,
            dst_addr: self.dst_addr,
            dst_port: self.dst_port,
            transport: self.transport,
        }
    }
}
