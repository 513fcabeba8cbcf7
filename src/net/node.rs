//! 节点类型
//!
//! 节点是可寻址的仿真端点：属于且只属于一个层级，创建后在整个仿真中存在。
//! 每个节点都能转发（等价于开启 IP 转发的主机）。

use super::id::{LinkId, NodeId};
use std::net::Ipv4Addr;

/// 网络节点
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    tier: String,
    index: usize,
    link_ends: Vec<LinkId>,
    addresses: Vec<Ipv4Addr>,
}

impl Node {
    pub fn new(id: NodeId, tier: impl Into<String>, index: usize) -> Self {
        let tier = tier.into();
        Self {
            id,
            name: format!("{tier}{index}"),
            tier,
            index,
            link_ends: Vec::new(),
            addresses: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// 节点名称，例如 `bot17`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 所属层级名称
    pub fn tier(&self) -> &str {
        &self.tier
    }

    /// 在所属层级内的序号
    pub fn index(&self) -> usize {
        self.index
    }

    /// 按安装顺序排列的已连接链路
    pub fn link_ends(&self) -> &[LinkId] {
        &self.link_ends
    }

    /// 按绑定顺序排列的接口地址
    pub fn addresses(&self) -> &[Ipv4Addr] {
        &self.addresses
    }

    /// 主地址：第一个绑定的接口地址，流量以它为目的地址
    pub fn primary_address(&self) -> Option<Ipv4Addr> {
        self.addresses.first().copied()
    }

    pub(crate) fn attach_link(&mut self, link: LinkId) {
        self.link_ends.push(link);
    }

    pub(crate) fn bind_address(&mut self, addr: Ipv4Addr) {
        self.addresses.push(addr);
    }
}
