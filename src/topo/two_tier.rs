//! 两层 DDoS 实验的默认层级表
//!
//! core(2) 互联；aggregation(6) 从 core1 星形接入；bot 接到 core0；
//! extra 用户集中挂在 aggregation2 上。

use crate::net::DataRate;

use super::tiered::{LinkProfile, NodeRef, Orientation, TierSpec, WiringRule};

pub const CORE: &str = "core";
pub const AGGREGATION: &str = "aggregation";
pub const BOT: &str = "bot";
pub const EXTRA: &str = "extra";

/// 各层节点数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoTierCounts {
    pub core: usize,
    pub aggregation: usize,
    pub bots: usize,
    pub extra: usize,
}

impl Default for TwoTierCounts {
    fn default() -> Self {
        Self {
            core: 2,
            aggregation: 6,
            bots: 100,
            extra: 4,
        }
    }
}

/// 生成两层拓扑的层级表
pub fn two_tier_tiers(counts: TwoTierCounts) -> Vec<TierSpec> {
    vec![
        TierSpec {
            name: CORE.into(),
            count: counts.core,
            link: LinkProfile::new(DataRate::from_mbps(100), 1_000),
            wiring: WiringRule::Pair { a: 0, b: 1 },
        },
        TierSpec {
            name: AGGREGATION.into(),
            count: counts.aggregation,
            link: LinkProfile::new(DataRate::from_mbps(10), 1_000),
            wiring: WiringRule::Star {
                hub_tier: CORE.into(),
                hub_index: 1,
                orientation: Orientation::HubFirst,
            },
        },
        TierSpec {
            name: BOT.into(),
            count: counts.bots,
            link: LinkProfile::new(DataRate::from_mbps(50), 2_000),
            wiring: WiringRule::Star {
                hub_tier: CORE.into(),
                hub_index: 0,
                orientation: Orientation::MemberFirst,
            },
        },
        TierSpec {
            name: EXTRA.into(),
            count: counts.extra,
            link: LinkProfile::new(DataRate::from_mbps(10), 1_000),
            wiring: WiringRule::Pinned {
                tier: AGGREGATION.into(),
                index: 2,
                orientation: Orientation::HubFirst,
            },
        },
    ]
}

/// 被攻击的节点：aggregation3
pub fn default_victim() -> NodeRef {
    NodeRef::new(AGGREGATION, 3)
}

/// 合法批量传输的源：core0
pub fn default_legit_source() -> NodeRef {
    NodeRef::new(CORE, 0)
}
