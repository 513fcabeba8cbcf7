//! 地址分配器
//!
//! 用一个单调递增的网络号计数器为链路分配地址块。计数器是分配器实例自己的字段，
//! 因此多个场景可以各用各的分配器互不干扰。分配顺序只取决于链路的创建顺序；
//! 块从不回收、从不复用。

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::block::{AddressBlock, InterfaceAddr, mask_bits};
use crate::error::{Result, ScenarioError};
use crate::net::{LinkId, Network};
use crate::topo::Topology;

/// 编址配置：起始网络与固定的前缀长度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressingSpec {
    pub base: Ipv4Addr,
    pub prefix_len: u8,
}

impl Default for AddressingSpec {
    fn default() -> Self {
        Self {
            base: Ipv4Addr::new(10, 1, 1, 0),
            prefix_len: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddressAllocator {
    base: Ipv4Addr,
    prefix_len: u8,
    /// 下一个要分配的网络号（网络地址右移主机位数）
    next_network: u64,
    /// 网络号上限（含）
    last_network: u64,
    allocated: usize,
}

impl AddressAllocator {
    pub fn new(spec: &AddressingSpec) -> Result<Self> {
        let invalid = |reason| ScenarioError::InvalidAddressBase {
            base: spec.base,
            prefix_len: spec.prefix_len,
            reason,
        };
        // 每个块至少要有两个可用主机地址
        if !(1..=30).contains(&spec.prefix_len) {
            return Err(invalid("prefix length must be within 1..=30"));
        }
        let base = u32::from(spec.base);
        if base & !mask_bits(spec.prefix_len) != 0 {
            return Err(invalid("base has host bits set"));
        }
        let host_bits = 32 - u32::from(spec.prefix_len);
        Ok(Self {
            base: spec.base,
            prefix_len: spec.prefix_len,
            next_network: u64::from(base >> host_bits),
            last_network: (1u64 << spec.prefix_len) - 1,
            allocated: 0,
        })
    }

    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// 剩余可分配的块数
    pub fn remaining(&self) -> u64 {
        (self.last_network + 1).saturating_sub(self.next_network)
    }

    fn host_bits(&self) -> u32 {
        32 - u32::from(self.prefix_len)
    }

    fn exhausted(&self) -> ScenarioError {
        ScenarioError::AddressExhausted {
            base: self.base,
            prefix_len: self.prefix_len,
            allocated: self.allocated,
        }
    }

    /// 取出当前网络号作为 `link` 的地址块，并前进到下一个网络
    pub fn assign(&mut self, link: LinkId, net: &mut Network) -> Result<AddressBlock> {
        if self.next_network > self.last_network {
            return Err(self.exhausted());
        }
        let l = net
            .link(link)
            .unwrap_or_else(|| panic!("cannot address link {}: not created", link.0))
            .clone();

        let network = (self.next_network as u32) << self.host_bits();
        let block = AddressBlock {
            link,
            network: Ipv4Addr::from(network),
            prefix_len: self.prefix_len,
            a: InterfaceAddr {
                node: l.a,
                addr: Ipv4Addr::from(network + 1),
            },
            b: InterfaceAddr {
                node: l.b,
                addr: Ipv4Addr::from(network + 2),
            },
        };
        net.bind_address(l.a, link, block.a.addr);
        net.bind_address(l.b, link, block.b.addr);

        self.next_network += 1;
        self.allocated += 1;
        debug!(
            link = link.0,
            network = %block.network,
            a = %block.a.addr,
            b = %block.b.addr,
            "分配地址块"
        );
        Ok(block)
    }

    /// 按拓扑的链路创建顺序为每条链路分配一个块。
    ///
    /// 地址空间不够时在绑定任何地址之前就报错。
    pub fn assign_all(&mut self, topo: &Topology, net: &mut Network) -> Result<Vec<AddressBlock>> {
        if (topo.links.len() as u64) > self.remaining() {
            return Err(ScenarioError::AddressExhausted {
                base: self.base,
                prefix_len: self.prefix_len,
                allocated: self.allocated + self.remaining() as usize,
            });
        }
        let blocks = topo
            .links
            .iter()
            .map(|&link| self.assign(link, net))
            .collect::<Result<Vec<_>>>()?;
        info!(
            blocks = blocks.len(),
            first = ?blocks.first().map(|b| b.network),
            last = ?blocks.last().map(|b| b.network),
            "地址分配完成"
        );
        Ok(blocks)
    }
}
