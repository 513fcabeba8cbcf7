//! 流测量器
//!
//! 被动计数：网络在应用发出、队列丢弃、到达目的地三处调用钩子。
//! 它只累加计数，从不丢包或重试。

use std::collections::BTreeMap;

use tracing::trace;

use super::stat::FlowStat;
use crate::net::{FlowId, Packet};
use crate::sim::SimTime;
use crate::traffic::TrafficFlow;

#[derive(Debug, Default, Clone)]
pub struct FlowMonitor {
    flows: BTreeMap<FlowId, FlowStat>,
}

impl FlowMonitor {
    /// 登记一条流；没有发送任何数据的流也会有一条全零记录
    pub fn register(&mut self, flow: &TrafficFlow) {
        self.flows.insert(
            flow.id,
            FlowStat {
                class: flow.class,
                src_addr: flow.src_addr,
                dst_addr: flow.dst_addr,
                dst_port: flow.dst_port,
                transport: flow.transport,
                tx_bytes: 0,
                tx_packets: 0,
                rx_bytes: 0,
                rx_packets: 0,
                lost_packets: 0,
                start: flow.start,
                stop: flow.stop,
                first_tx: None,
                last_tx: None,
                first_rx: None,
                last_rx: None,
                delay_sum: SimTime::ZERO,
            },
        );
    }

    fn stat_mut(&mut self, flow: FlowId) -> Option<&mut FlowStat> {
        let st = self.flows.get_mut(&flow);
        if st.is_none() {
            trace!(flow = flow.0, "未登记的流，忽略");
        }
        st
    }

    pub fn on_tx(&mut self, pkt: &Packet, now: SimTime) {
        if let Some(st) = self.stat_mut(pkt.flow_id) {
            st.tx_packets += 1;
            st.tx_bytes += pkt.payload_bytes as u64;
            st.first_tx.get_or_insert(now);
            st.last_tx = Some(now);
        }
    }

    pub fn on_rx(&mut self, pkt: &Packet, now: SimTime) {
        if let Some(st) = self.stat_mut(pkt.flow_id) {
            st.rx_packets += 1;
            st.rx_bytes += pkt.payload_bytes as u64;
            st.first_rx.get_or_insert(now);
            st.last_rx = Some(now);
            st.delay_sum = st.delay_sum.after(now.since(pkt.sent_at));
        }
    }

    pub fn on_drop(&mut self, pkt: &Packet) {
        if let Some(st) = self.stat_mut(pkt.flow_id) {
            st.lost_packets += 1;
        }
    }

    /// 流停止（截止时刻或自然结束）
    pub fn on_flow_stopped(&mut self, flow: FlowId, now: SimTime) {
        if let Some(st) = self.stat_mut(flow) {
            st.stop = now;
        }
    }

    pub fn get(&self, flow: FlowId) -> Option<&FlowStat> {
        self.flows.get(&flow)
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn stats(&self) -> &BTreeMap<FlowId, FlowStat> {
        &self.flows
    }

    pub fn into_stats(self) -> BTreeMap<FlowId, FlowStat> {
        self.flows
    }
}
