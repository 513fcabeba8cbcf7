//! 每条链路的汇总计数与利用率

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::addr::AddressBlock;
use crate::net::{ChannelStats, DataRate, LinkId, Network, NodeId};
use crate::sim::SimTime;

#[derive(Debug, Clone, Serialize)]
pub struct DirectionUsage {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(flatten)]
    pub counters: ChannelStats,
    pub utilization: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkUsage {
    pub link: LinkId,
    pub profile: String,
    pub rate: DataRate,
    pub delay: SimTime,
    pub network: Option<Ipv4Addr>,
    /// `[a->b, b->a]`
    pub directions: [DirectionUsage; 2],
}

impl LinkUsage {
    pub fn tx_bytes(&self) -> u64 {
        self.directions.iter().map(|d| d.counters.tx_bytes).sum()
    }

    pub fn dropped_pkts(&self) -> u64 {
        self.directions.iter().map(|d| d.counters.dropped_pkts).sum()
    }

    /// 两个方向中较高的利用率
    pub fn peak_utilization(&self) -> f64 {
        self.directions[0].utilization.max(self.directions[1].utilization)
    }
}

/// 读取网络中所有链路的计数器；利用率以 `window` 为分母
pub fn collect_link_usage(net: &Network, blocks: &[AddressBlock], window: SimTime) -> Vec<LinkUsage> {
    net.links()
        .iter()
        .map(|l| {
            let dir = |i: usize| {
                let ch = &net.channels()[l.channels[i].0];
                DirectionUsage {
                    from: ch.from,
                    to: ch.to,
                    counters: ch.stats.clone(),
                    utilization: ch.stats.utilization(window.0),
                }
            };
            LinkUsage {
                link: l.id,
                profile: l.profile.clone(),
                rate: l.rate,
                delay: l.delay,
                network: blocks.iter().find(|b| b.link == l.id).map(|b| b.network),
                directions: [dir(0), dir(1)],
            }
        })
        .collect()
}
