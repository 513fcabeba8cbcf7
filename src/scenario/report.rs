//! 场景报告
//!
//! 仿真跑完后的内存结果：流标识 -> 流统计，以及每条链路的计数器。
//! 可直接序列化为 JSON，交给外部的报告/可视化层。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::addr::AddressBlock;
use crate::flowmon::{FlowStat, LinkUsage};
use crate::net::{FlowId, Stats};
use crate::sim::SimTime;
use crate::traffic::{FlowClass, SinkReport, TrafficFlow};

#[derive(Debug, Clone, Serialize)]
pub struct TierSummary {
    pub name: String,
    pub nodes: usize,
    pub links: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub horizon: SimTime,
    pub events: u64,
    pub tiers: Vec<TierSummary>,
    pub blocks: Vec<AddressBlock>,
    pub links: Vec<LinkUsage>,
    pub flows: Vec<TrafficFlow>,
    pub flow_stats: BTreeMap<FlowId, FlowStat>,
    pub sink: SinkReport,
    pub net: Stats,
}

impl ScenarioReport {
    pub fn stats_of(&self, class: FlowClass) -> impl Iterator<Item = (&FlowId, &FlowStat)> {
        self.flow_stats.iter().filter(move |(_, s)| s.class == class)
    }

    pub fn legit(&self) -> Option<&FlowStat> {
        self.stats_of(FlowClass::Legitimate).map(|(_, s)| s).next()
    }

    /// 某类流的（发送，接收）载荷字节总数
    pub fn totals(&self, class: FlowClass) -> (u64, u64) {
        self.stats_of(class)
            .fold((0, 0), |(tx, rx), (_, s)| (tx + s.tx_bytes, rx + s.rx_bytes))
    }

    /// 利用率最高的链路
    pub fn busiest_link(&self) -> Option<&LinkUsage> {
        self.links
            .iter()
            .max_by(|a, b| a.peak_utilization().total_cmp(&b.peak_utilization()))
    }
}
