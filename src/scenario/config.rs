//! 场景配置
//!
//! 启动时一次性读入（JSON）。缺省值就是两层 DDoS 实验：
//! 2 个 core、6 个 aggregation、100 个 bot、4 个 extra，仿真 10 秒。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::addr::AddressingSpec;
use crate::error::{Result, ScenarioError};
use crate::queue::mem_from_pkt;
use crate::sim::SimTime;
use crate::topo::TierSpec;
use crate::topo::two_tier::{TwoTierCounts, two_tier_tiers};
use crate::traffic::TrafficSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub tiers: Vec<TierSpec>,
    pub addressing: AddressingSpec,
    pub traffic: TrafficSpec,
    /// 仿真时长（毫秒）
    pub horizon_ms: u64,
    /// 每个信道出口队列的容量（包数）；不填表示不限
    pub queue_pkts: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::two_tier(TwoTierCounts::default())
    }
}

impl ScenarioConfig {
    /// 两层实验，节点数可调
    pub fn two_tier(counts: TwoTierCounts) -> Self {
        Self {
            tiers: two_tier_tiers(counts),
            addressing: AddressingSpec::default(),
            traffic: TrafficSpec::default(),
            horizon_ms: 10_000,
            queue_pkts: None,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn horizon(&self) -> SimTime {
        SimTime::from_millis(self.horizon_ms)
    }

    pub fn queue_bytes(&self) -> Option<u64> {
        self.queue_pkts.map(mem_from_pkt)
    }

    /// 与拓扑无关的检查
    pub fn validate(&self) -> Result<()> {
        if self.horizon_ms == 0 {
            return Err(ScenarioError::NonPositive("horizon_ms"));
        }
        if self.queue_pkts == Some(0) {
            return Err(ScenarioError::NonPositive("queue_pkts"));
        }
        self.traffic.validate()?;
        // 攻击流从 0 时刻持续发送到截止时刻
        let attack = &self.traffic.attack;
        if attack.off_time_ms != 0 || attack.on_time_ms < self.horizon_ms {
            return Err(ScenarioError::AttackNotContinuous {
                on_time_ms: attack.on_time_ms,
                off_time_ms: attack.off_time_ms,
                horizon_ms: self.horizon_ms,
            });
        }
        Ok(())
    }

    /// 修改仿真时长；攻击流的"开"时长至少跟上新的时长
    pub fn set_horizon_ms(&mut self, horizon_ms: u64) {
        self.horizon_ms = horizon_ms;
        let attack = &mut self.traffic.attack;
        attack.on_time_ms = attack.on_time_ms.max(horizon_ms);
    }

    /// 修改某个层级的节点数；层级不存在时返回 false
    pub fn set_tier_count(&mut self, tier: &str, count: usize) -> bool {
        match self.tiers.iter_mut().find(|t| t.name == tier) {
            Some(t) => {
                t.count = count;
                true
            }
            None => false,
        }
    }
}
