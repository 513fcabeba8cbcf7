//! 最短跳数路由表
//!
//! 相当于"全局路由填充"：基于当前拓扑，为每个 (from, dst) 预计算所有
//! 等价最短路径的下一跳集合。存在多个候选时按流标识做稳定哈希选择，
//! 同一条流的所有 packet 走同一条路径。

use std::collections::{HashMap, VecDeque};

use super::id::{FlowId, NodeId};

#[derive(Debug, Clone)]
pub struct RoutingTable {
    dirty: bool,
    /// (from, dst) -> 等价最短路径下一跳
    next_hops: HashMap<(NodeId, NodeId), Vec<NodeId>>,
    hash_salt: u64,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RoutingTable {
    pub fn new(hash_salt: u64) -> Self {
        Self {
            dirty: true,
            next_hops: HashMap::new(),
            hash_salt,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_built(&self) -> bool {
        !self.dirty
    }

    /// 确保路由表基于当前拓扑是最新的。
    ///
    /// `adj[from]` 为从 `from` 出发的所有出边邻居；
    /// `rev_adj[to]` 为所有能到达 `to` 的前驱节点。
    pub fn ensure_built(&mut self, adj: &[Vec<NodeId>], rev_adj: &[Vec<NodeId>]) {
        if !self.dirty {
            return;
        }

        let n = adj.len();
        self.next_hops.clear();

        // 对每个 dst 在反向图上 BFS 得到跳数 dist[*]，
        // 再为每个 from 选出满足 dist[next] = dist[from] - 1 的邻居。
        let mut dist: Vec<u32> = vec![u32::MAX; n];
        let mut q: VecDeque<usize> = VecDeque::new();

        for dst_idx in 0..n {
            dist.fill(u32::MAX);
            q.clear();
            dist[dst_idx] = 0;
            q.push_back(dst_idx);

            while let Some(v) = q.pop_front() {
                let dv = dist[v];
                for &pred in &rev_adj[v] {
                    if dist[pred.0] == u32::MAX {
                        dist[pred.0] = dv + 1;
                        q.push_back(pred.0);
                    }
                }
            }

            for from_idx in 0..n {
                let df = dist[from_idx];
                if from_idx == dst_idx || df == u32::MAX {
                    continue;
                }
                let cands: Vec<NodeId> = adj[from_idx]
                    .iter()
                    .copied()
                    .filter(|nh| dist[nh.0] == df - 1)
                    .collect();
                if !cands.is_empty() {
                    self.next_hops.insert((NodeId(from_idx), NodeId(dst_idx)), cands);
                }
            }
        }

        self.dirty = false;
    }

    /// (from, dst) 的下一跳候选集合
    pub fn next_hops(&self, from: NodeId, dst: NodeId) -> Option<&[NodeId]> {
        self.next_hops.get(&(from, dst)).map(|v| v.as_slice())
    }

    /// 选择下一跳；不可达时返回 None
    pub fn next_hop(&self, from: NodeId, dst: NodeId, flow: FlowId) -> Option<NodeId> {
        let cands = self.next_hops(from, dst)?;
        if cands.len() == 1 {
            return Some(cands[0]);
        }
        let h = mix64(
            flow.0 ^ (from.0 as u64).wrapping_mul(0x9E3779B97F4A7C15) ^ (dst.0 as u64) ^ self.hash_salt,
        );
        Some(cands[(h as usize) % cands.len()])
    }
}

/// splitmix64：确定性的 64-bit 混合，避免 RandomState 带来的跨运行差异
fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
