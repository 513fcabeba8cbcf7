//! 批量发送（合法流）
//!
//! 以源节点第一跳信道的线速连续发送分段，直到总字节预算用完。
//! 预算用完即自然结束，并把结束时刻记为该流的停止时间。
//! 不做确认与重传：丢掉的分段就丢了。

use std::any::Any;

use tracing::info;

use crate::net::{FlowId, FlowTuple, Network, NodeId};
use crate::sim::{SimTime, Simulator};

use super::app::{AppId, Application, schedule_timer};

#[derive(Debug)]
pub struct BulkSendApplication {
    flow: FlowId,
    tuple: FlowTuple,
    /// 每个分段的载荷字节数
    send_bytes: u32,
    max_bytes: u64,
    sent_bytes: u64,
    sent_pkts: u64,
    running: bool,
    finished_at: Option<SimTime>,
}

impl BulkSendApplication {
    pub fn new(flow: FlowId, tuple: FlowTuple, send_bytes: u32, max_bytes: u64) -> Self {
        Self {
            flow,
            tuple,
            send_bytes,
            max_bytes,
            sent_bytes: 0,
            sent_pkts: 0,
            running: false,
            finished_at: None,
        }
    }

    pub fn flow(&self) -> FlowId {
        self.flow
    }

    pub fn sent_bytes(&self) -> u64 {
        self.sent_bytes
    }

    pub fn sent_pkts(&self) -> u64 {
        self.sent_pkts
    }

    /// 预算用完的时刻；未用完则为 None
    pub fn finished_at(&self) -> Option<SimTime> {
        self.finished_at
    }

    fn finish(&mut self, now: SimTime, net: &mut Network) {
        self.running = false;
        self.finished_at = Some(now);
        if let Some(fm) = &mut net.flowmon {
            fm.on_flow_stopped(self.flow, now);
        }
        info!(flow = self.flow.0, sent_bytes = self.sent_bytes, at = %now, "批量发送达到字节预算，自然结束");
    }

    fn send_next(&mut self, me: AppId, sim: &mut Simulator, net: &mut Network) {
        let remaining = self.max_bytes.saturating_sub(self.sent_bytes);
        if remaining == 0 {
            self.finish(sim.now(), net);
            return;
        }
        let len = remaining.min(self.send_bytes as u64) as u32;
        let pkt = net.make_packet(self.flow, self.tuple, len, sim.now());
        let pace = net
            .egress_rate(self.tuple.src, self.tuple.dst, self.flow)
            .map(|r| r.tx_time(pkt.size_bytes))
            .unwrap_or(SimTime::ZERO)
            .max(SimTime(1));
        net.send(pkt, sim);
        self.sent_bytes += len as u64;
        self.sent_pkts += 1;

        if self.sent_bytes >= self.max_bytes {
            self.finish(sim.now(), net);
        } else {
            let at = sim.now().after(pace);
            schedule_timer(sim, at, me);
        }
    }
}

impl Application for BulkSendApplication {
    fn node(&self) -> NodeId {
        self.tuple.src
    }

    fn start(&mut self, me: AppId, sim: &mut Simulator, net: &mut Network) {
        self.running = true;
        self.send_next(me, sim, net);
    }

    fn on_timer(&mut self, me: AppId, sim: &mut Simulator, net: &mut Network) {
        if self.running {
            self.send_next(me, sim, net);
        }
    }

    fn stop(&mut self, sim: &mut Simulator, net: &mut Network) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(fm) = &mut net.flowmon {
            fm.on_flow_stopped(self.flow, sim.now());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
