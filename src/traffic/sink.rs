//! 受害者接收端
//!
//! 在受害节点上监听一个（传输层类型，端口）。除了接受匹配的流量，
//! 它还按源地址记录每一个到达受害节点的 packet，不论是否匹配。
//! 停止时刻本身到达的 packet 仍然计入，与流量监测的口径一致。

use std::any::Any;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::net::{Network, NodeId, Packet, TransportKind};
use crate::sim::{SimTime, Simulator};

use super::app::{AppId, Application};

/// 某个源地址到达受害节点的流量
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceStat {
    pub pkts: u64,
    pub bytes: u64,
}

/// 接收端汇总（可直接序列化进报告）
#[derive(Debug, Clone, Serialize)]
pub struct SinkReport {
    pub node: NodeId,
    pub port: u16,
    pub transport: TransportKind,
    pub accepted_pkts: u64,
    pub accepted_bytes: u64,
    pub other_pkts: u64,
    pub other_bytes: u64,
    pub first_rx: Option<SimTime>,
    pub last_rx: Option<SimTime>,
    pub distinct_sources: usize,
    pub sources: BTreeMap<Ipv4Addr, SourceStat>,
}

#[derive(Debug)]
pub struct PacketSink {
    node: NodeId,
    port: u16,
    transport: TransportKind,
    started: bool,
    stopped_at: Option<SimTime>,
    accepted_pkts: u64,
    accepted_bytes: u64,
    other_pkts: u64,
    other_bytes: u64,
    first_rx: Option<SimTime>,
    last_rx: Option<SimTime>,
    sources: BTreeMap<Ipv4Addr, SourceStat>,
}

impl PacketSink {
    pub fn new(node: NodeId, transport: TransportKind, port: u16) -> Self {
        Self {
            node,
            port,
            transport,
            started: false,
            stopped_at: None,
            accepted_pkts: 0,
            accepted_bytes: 0,
            other_pkts: 0,
            other_bytes: 0,
            first_rx: None,
            last_rx: None,
            sources: BTreeMap::new(),
        }
    }

    /// 接受的载荷字节数
    pub fn accepted_bytes(&self) -> u64 {
        self.accepted_bytes
    }

    pub fn accepted_pkts(&self) -> u64 {
        self.accepted_pkts
    }

    /// 有流量到达受害节点的不同源地址数
    pub fn distinct_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn sources(&self) -> &BTreeMap<Ipv4Addr, SourceStat> {
        &self.sources
    }

    pub fn report(&self) -> SinkReport {
        SinkReport {
            node: self.node,
            port: self.port,
            transport: self.transport,
            accepted_pkts: self.accepted_pkts,
            accepted_bytes: self.accepted_bytes,
            other_pkts: self.other_pkts,
            other_bytes: self.other_bytes,
            first_rx: self.first_rx,
            last_rx: self.last_rx,
            distinct_sources: self.sources.len(),
            sources: self.sources.clone(),
        }
    }
}

impl Application for PacketSink {
    fn node(&self) -> NodeId {
        self.node
    }

    fn start(&mut self, _me: AppId, _sim: &mut Simulator, _net: &mut Network) {
        self.started = true;
    }

    fn stop(&mut self, sim: &mut Simulator, _net: &mut Network) {
        self.stopped_at = Some(sim.now());
    }

    fn on_receive(&mut self, pkt: &Packet, now: SimTime) {
        if !self.started || self.stopped_at.is_some_and(|t| now > t) {
            return;
        }
        let payload = pkt.payload_bytes as u64;
        let src = self.sources.entry(pkt.tuple.src_addr).or_default();
        src.pkts += 1;
        src.bytes += payload;
        self.first_rx.get_or_insert(now);
        self.last_rx = Some(now);

        if pkt.tuple.transport == self.transport && pkt.tuple.dst_port == self.port {
            self.accepted_pkts += 1;
            self.accepted_bytes += payload;
        } else {
            self.other_pkts += 1;
            self.other_bytes += payload;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
