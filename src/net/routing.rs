//! 等价下一跳路由表
//!
//! 为每个 (节点, 目的地) 记录所有位于最短跳数路径上的出链路，
//! 它们就是交给负载均衡的候选。拓扑变化后惰性重建。

use std::collections::{HashMap, VecDeque};

use super::id::{LinkId, NodeId};
use super::link::Link;

#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    dirty: bool,
    next_hops: HashMap<(NodeId, NodeId), Vec<LinkId>>,
    hash_salt: u64,
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

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 若拓扑自上次构建后有变化，则基于 `links` 重建路由表。
    pub fn ensure_built(&mut self, num_nodes: usize, links: &[Link]) {
        if !self.dirty {
            return;
        }
        self.next_hops.clear();

        let mut out_links: Vec<Vec<LinkId>> = vec![Vec::new(); num_nodes];
        let mut preds: Vec<Vec<NodeId>> = vec![Vec::new(); num_nodes];
        for (i, l) in links.iter().enumerate() {
            out_links[l.from.0].push(LinkId(i));
            preds[l.to.0].push(l.from);
        }

        // 在反向图上 BFS 求到目的地的跳数；能让距离减一的链路即为候选。
        let mut dist = vec![u32::MAX; num_nodes];
        let mut q = VecDeque::new();
        for dst in 0..num_nodes {
            dist.fill(u32::MAX);
            dist[dst] = 0;
            q.clear();
            q.push_back(dst);
            while let Some(v) = q.pop_front() {
                for p in &preds[v] {
                    if dist[p.0] == u32::MAX {
                        dist[p.0] = dist[v] + 1;
                        q.push_back(p.0);
                    }
                }
            }

            for from in 0..num_nodes {
                let df = dist[from];
                if from == dst || df == u32::MAX {
                    continue;
                }
                let cands: Vec<LinkId> = out_links[from]
                    .iter()
                    .copied()
                    .filter(|l| dist[links[l.0].to.0] == df - 1)
                    .collect();
                if !cands.is_empty() {
                    self.next_hops.insert((NodeId(from), NodeId(dst)), cands);
                }
            }
        }

        self.dirty = false;
    }

    /// `from` 通往 `dst` 的候选链路，按链路创建顺序；不可达时为空。
    pub fn next_hops(&self, from: NodeId, dst: NodeId) -> &[LinkId] {
        self.next_hops
            .get(&(from, dst))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 以 key（如 flow id）在 `cands` 中做稳定的哈希选择。
    pub fn pick_ecmp(&self, from: NodeId, dst: NodeId, key: u64, cands: &[LinkId]) -> Option<LinkId> {
        if cands.is_empty() {
            return None;
        }
        let h = mix64(
            key ^ (from.0 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
                ^ (dst.0 as u64)
                ^ self.hash_salt,
        );
        Some(cands[(h % cands.len() as u64) as usize])
    }
}

/// splitmix64 混合函数
pub(crate) fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
