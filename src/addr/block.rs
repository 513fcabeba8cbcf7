//! 地址块
//!
//! 绑定到一条点对点链路上的子网；两个端点依次拿到块内的第一、第二个主机地址。

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::net::{LinkId, NodeId};

/// 一个接口地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterfaceAddr {
    pub node: NodeId,
    pub addr: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressBlock {
    pub link: LinkId,
    pub network: Ipv4Addr,
    pub prefix_len: u8,
    /// 链路端点 `a` 的接口（`.1`）
    pub a: InterfaceAddr,
    /// 链路端点 `b` 的接口（`.2`）
    pub b: InterfaceAddr,
}

impl AddressBlock {
    pub fn mask(&self) -> Ipv4Addr {
        Ipv4Addr::from(mask_bits(self.prefix_len))
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network) | !mask_bits(self.prefix_len))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let m = mask_bits(self.prefix_len);
        u32::from(addr) & m == u32::from(self.network)
    }

    /// 两个块是否有任何地址重叠
    pub fn overlaps(&self, other: &AddressBlock) -> bool {
        let shorter = self.prefix_len.min(other.prefix_len);
        let m = mask_bits(shorter);
        u32::from(self.network) & m == u32::from(other.network) & m
    }

    /// 该块中给 `node` 的接口地址
    pub fn address_of(&self, node: NodeId) -> Option<Ipv4Addr> {
        [self.a, self.b]
            .into_iter()
            .find(|i| i.node == node)
            .map(|i| i.addr)
    }
}

pub(crate) fn mask_bits(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        p if p >= 32 => u32::MAX,
        p => u32::MAX << (32 - p),
    }
}
