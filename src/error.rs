//! 场景配置错误
//!
//! 所有配置错误都在构建阶段返回，任何事件执行之前。
//! 组合顺序错误（先连线后建节点、未编址先调度）属于程序缺陷，直接 panic。

use std::net::Ipv4Addr;

use crate::net::ParseDataRateError;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("tier `{0}` is declared more than once")]
    DuplicateTier(String),

    #[error("tier `{tier}` references unknown tier `{target}`")]
    UnknownTier { tier: String, target: String },

    #[error("tier `{tier}` needs node {index} of tier `{target}`, which has {count} nodes")]
    NodeOutOfRange {
        tier: String,
        target: String,
        index: usize,
        count: usize,
    },

    #[error("tier `{tier}` would link node {index} to itself")]
    SelfLink { tier: String, index: usize },

    #[error("tier `{0}` has a zero link data rate")]
    ZeroLinkRate(String),

    #[error("invalid address base {base}/{prefix_len}: {reason}")]
    InvalidAddressBase {
        base: Ipv4Addr,
        prefix_len: u8,
        reason: &'static str,
    },

    #[error("address space exhausted after {allocated} blocks starting at {base}/{prefix_len}")]
    AddressExhausted {
        base: Ipv4Addr,
        prefix_len: u8,
        allocated: usize,
    },

    #[error("invalid {role} reference {tier}[{index}]: {reason}")]
    InvalidEndpoint {
        role: &'static str,
        tier: String,
        index: usize,
        reason: &'static str,
    },

    #[error("victim {0} is also one of the traffic sources")]
    SourceIsVictim(String),

    #[error("no route from {from} to {to}")]
    Unreachable { from: String, to: String },

    #[error(
        "attack traffic must cover the whole run: on_time_ms={on_time_ms} off_time_ms={off_time_ms} horizon_ms={horizon_ms}"
    )]
    AttackNotContinuous {
        on_time_ms: u64,
        off_time_ms: u64,
        horizon_ms: u64,
    },

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error(transparent)]
    DataRate(#[from] ParseDataRateError),

    #[error("failed to read scenario config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ScenarioError> = std::result::Result<T, E>;
