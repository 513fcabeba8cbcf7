//! 分层拓扑构建
//!
//! 由一张声明式的层级表生成全部节点与点对点链路：
//! 先创建所有层级的节点，再按声明顺序逐层连线（层内按节点序号）。
//! 链路的创建顺序即地址分配顺序，因此这里的遍历顺序是确定的。

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScenarioError};
use crate::net::{DataRate, LinkId, Network, NodeId};
use crate::sim::SimTime;

/// 某层级所有链路共用的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkProfile {
    pub rate: DataRate,
    /// 单向传播时延（微秒）
    pub delay_us: u64,
}

impl LinkProfile {
    pub fn new(rate: DataRate, delay_us: u64) -> Self {
        Self { rate, delay_us }
    }

    pub fn delay(&self) -> SimTime {
        SimTime::from_micros(self.delay_us)
    }
}

/// 决定新链路哪一端是端点 `a`（地址块中的 `.1`）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    HubFirst,
    MemberFirst,
}

/// 连线规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum WiringRule {
    /// 把本层的 `a` 号与 `b` 号节点相连（核心互联）
    Pair { a: usize, b: usize },
    /// 本层每个节点各用一条链路连到上层的一个汇聚节点
    Star {
        hub_tier: String,
        hub_index: usize,
        #[serde(default)]
        orientation: Orientation,
    },
    /// 本层每个节点都挂到另一层的某个指定节点上
    Pinned {
        tier: String,
        index: usize,
        #[serde(default)]
        orientation: Orientation,
    },
    /// 不建链路
    Isolated,
}

/// 一个层级的声明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    pub name: String,
    pub count: usize,
    pub link: LinkProfile,
    pub wiring: WiringRule,
}

/// 按（层级名，层内序号）引用一个节点
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub tier: String,
    pub index: usize,
}

impl NodeRef {
    pub fn new(tier: impl Into<String>, index: usize) -> Self {
        Self {
            tier: tier.into(),
            index,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tier, self.index)
    }
}

/// 已创建的层级
#[derive(Debug, Clone)]
pub struct Tier {
    pub name: String,
    pub nodes: Vec<NodeId>,
    /// 由本层连线规则创建的链路（创建顺序）
    pub links: Vec<LinkId>,
}

/// 构建结果：层级与按创建顺序排列的全部链路
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub tiers: Vec<Tier>,
    pub links: Vec<LinkId>,
}

impl Topology {
    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    pub fn resolve(&self, r: &NodeRef) -> Option<NodeId> {
        self.tier(&r.tier)?.nodes.get(r.index).copied()
    }

    pub fn node_count(&self) -> usize {
        self.tiers.iter().map(|t| t.nodes.len()).sum()
    }
}

/// 层级表驱动的拓扑构建器
#[derive(Debug, Clone, Copy)]
pub struct TopologyBuilder<'a> {
    tiers: &'a [TierSpec],
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(tiers: &'a [TierSpec]) -> Self {
        Self { tiers }
    }

    /// 检查层级表，不修改任何东西
    pub fn validate(&self) -> Result<()> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for t in self.tiers {
            if counts.insert(t.name.as_str(), t.count).is_some() {
                return Err(ScenarioError::DuplicateTier(t.name.clone()));
            }
        }

        for t in self.tiers {
            let target = match &t.wiring {
                WiringRule::Pair { .. } | WiringRule::Isolated => None,
                WiringRule::Star {
                    hub_tier: tier,
                    hub_index: index,
                    ..
                }
                | WiringRule::Pinned { tier, index, .. } => {
                    let Some(&count) = counts.get(tier.as_str()) else {
                        return Err(ScenarioError::UnknownTier {
                            tier: t.name.clone(),
                            target: tier.clone(),
                        });
                    };
                    Some((tier, *index, count))
                }
            };

            // 空层不建链路，也不要求它引用的节点存在
            if t.count == 0 || t.wiring == WiringRule::Isolated {
                continue;
            }
            if t.link.rate.bps() == 0 {
                return Err(ScenarioError::ZeroLinkRate(t.name.clone()));
            }

            let out_of_range = |target: &str, index: usize, count: usize| ScenarioError::NodeOutOfRange {
                tier: t.name.clone(),
                target: target.to_string(),
                index,
                count,
            };
            match (&t.wiring, target) {
                (WiringRule::Pair { a, b }, _) => {
                    if a == b {
                        return Err(ScenarioError::SelfLink {
                            tier: t.name.clone(),
                            index: *a,
                        });
                    }
                    for &i in [a, b] {
                        if i >= t.count {
                            return Err(out_of_range(&t.name, i, t.count));
                        }
                    }
                }
                (_, Some((tier, index, count))) => {
                    if *tier == t.name {
                        return Err(ScenarioError::SelfLink {
                            tier: t.name.clone(),
                            index,
                        });
                    }
                    if index >= count {
                        return Err(out_of_range(tier.as_str(), index, count));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// 在 `net` 中创建全部节点与链路
    pub fn build(&self, net: &mut Network) -> Result<Topology> {
        self.validate()?;

        let mut topo = Topology::default();
        for t in self.tiers {
            let nodes = (0..t.count).map(|i| net.add_node(&t.name, i)).collect();
            topo.tiers.push(Tier {
                name: t.name.clone(),
                nodes,
                links: Vec::new(),
            });
        }

        for (ti, t) in self.tiers.iter().enumerate() {
            let members = topo.tiers[ti].nodes.clone();
            let pairs: Vec<(NodeId, NodeId)> = match &t.wiring {
                WiringRule::Isolated => Vec::new(),
                _ if members.is_empty() => Vec::new(),
                WiringRule::Pair { a, b } => vec![(members[*a], members[*b])],
                WiringRule::Star {
                    hub_tier: tier,
                    hub_index: index,
                    orientation,
                }
                | WiringRule::Pinned {
                    tier,
                    index,
                    orientation,
                } => {
                    let hub = topo
                        .resolve(&NodeRef::new(tier.as_str(), *index))
                        .expect("hub validated above");
                    members
                        .iter()
                        .map(|&m| match orientation {
                            Orientation::HubFirst => (hub, m),
                            Orientation::MemberFirst => (m, hub),
                        })
                        .collect()
                }
            };

            let delay = t.link.delay();
            for (a, b) in pairs {
                let id = net.connect(a, b, t.link.rate, delay, &t.name);
                topo.tiers[ti].links.push(id);
                topo.links.push(id);
            }
            debug!(
                tier = %t.name,
                nodes = t.count,
                links = topo.tiers[ti].links.len(),
                rate = %t.link.rate,
                delay_us = t.link.delay_us,
                "层级连线完成"
            );
        }

        info!(
            tiers = topo.tiers.len(),
            nodes = topo.node_count(),
            links = topo.links.len(),
            "拓扑构建完成"
        );
        Ok(topo)
    }
}
