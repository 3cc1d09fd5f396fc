//! 两层 leaf-spine 拓扑
//!
//! 每个 leaf 连接所有 spine，主机挂在 leaf 下。跨 leaf 的流量每个 spine
//! 一条等价路径，所以真正需要负载均衡决策的是 leaf。

use serde::{Deserialize, Serialize};

use crate::net::{NetWorld, NodeId};
use crate::queue::DEFAULT_QUEUE_PKTS;
use crate::sim::SimTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafSpineOpts {
    pub leaves: usize,
    pub spines: usize,
    pub hosts_per_leaf: usize,
    pub link_bps: u64,
    pub link_latency_us: u64,
    /// 每条链路的出口队列容量（包数）
    pub queue_pkts: usize,
}

impl Default for LeafSpineOpts {
    fn default() -> Self {
        Self {
            leaves: 4,
            spines: 2,
            hosts_per_leaf: 1,
            link_bps: 100_000_000,
            link_latency_us: 10,
            queue_pkts: DEFAULT_QUEUE_PKTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeafSpineTopology {
    pub hosts_per_leaf: usize,
    pub leaves: Vec<NodeId>,
    pub spines: Vec<NodeId>,
    /// 按 leaf 排列：先是 leaf 0 的主机
    pub hosts: Vec<NodeId>,
}

impl LeafSpineTopology {
    pub fn host(&self, leaf: usize, index: usize) -> NodeId {
        self.hosts[leaf * self.hosts_per_leaf + index]
    }

    /// 主机所挂的 leaf 下标
    pub fn leaf_of(&self, host: NodeId) -> Option<usize> {
        let pos = self.hosts.iter().position(|&h| h == host)?;
        Some(pos / self.hosts_per_leaf.max(1))
    }
}

/// 在 `world` 中构建拓扑。交换机使用网络当前的负载均衡策略，
/// 因此要么先安装策略，要么之后再调用
/// [`Network::set_load_balancer`](crate::net::Network::set_load_balancer)。
pub fn build_leaf_spine(world: &mut NetWorld, opts: &LeafSpineOpts) -> LeafSpineTopology {
    let net = &mut world.net;
    net.set_queue_capacity_pkts(opts.queue_pkts);
    let latency = SimTime::from_micros(opts.link_latency_us);
    let bps = opts.link_bps;

    let spines: Vec<NodeId> = (0..opts.spines)
        .map(|j| net.add_switch(format!("spine{j}")))
        .collect();

    let mut leaves = Vec::with_capacity(opts.leaves);
    let mut hosts = Vec::with_capacity(opts.leaves * opts.hosts_per_leaf);
    for i in 0..opts.leaves {
        let leaf = net.add_switch(format!("leaf{i}"));
        for &spine in &spines {
            net.connect(leaf, spine, latency, bps);
            net.connect(spine, leaf, latency, bps);
        }
        for h in 0..opts.hosts_per_leaf {
            let host = net.add_host(format!("h{i}_{h}"));
            net.connect(host, leaf, latency, bps);
            net.connect(leaf, host, latency, bps);
            hosts.push(host);
        }
        leaves.push(leaf);
    }

    LeafSpineTopology {
        hosts_per_leaf: opts.hosts_per_leaf,
        leaves,
        spines,
        hosts,
    }
}
