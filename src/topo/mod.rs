//! 拓扑构建
//!
//! `tiered` 是通用的层级表构建器；`two_tier` 给出默认实验的层级表。

pub mod tiered;
pub mod two_tier;

pub use tiered::{LinkProfile, NodeRef, Orientation, Tier, TierSpec, Topology, TopologyBuilder, WiringRule};
