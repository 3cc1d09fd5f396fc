//! Leaf-spine 实验场景
//!
//! 场景是一个 JSON 文档，描述拓扑、负载均衡策略和要运行的 flow。
//! 所有字段都有默认值，所以 `{}` 也是合法场景：4 个 leaf、2 个 spine，
//! 运行 DRILL(2, 1)，每台主机向下一个 leaf 上的对应主机发包。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drill::DrillError;
use crate::net::{LoadBalancer, NetWorld, Stats};
use crate::sim::{SimTime, Simulator};
use crate::topo::{LeafSpineOpts, LeafSpineTopology, build_leaf_spine};
use crate::traffic::{FlowSpec, InjectFlow};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
    #[error(transparent)]
    Drill(#[from] DrillError),
}

/// `flows` 为空时自动生成的 flow 所用的发包参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficDefaults {
    pub pkts: u64,
    pub pkt_bytes: u32,
    pub gap_us: u64,
}

impl Default for TrafficDefaults {
    fn default() -> Self {
        Self {
            pkts: 1000,
            pkt_bytes: 1500,
            gap_us: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSpec {
    pub topology: LeafSpineOpts,
    pub balancer: LoadBalancer,
    pub seed: u64,
    pub until_ms: u64,
    /// 主机下标对应 `LeafSpineTopology::hosts`
    pub flows: Vec<FlowSpec>,
    pub traffic: TrafficDefaults,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            topology: LeafSpineOpts::default(),
            balancer: LoadBalancer::default(),
            seed: 1,
            until_ms: 1_000,
            flows: Vec::new(),
            traffic: TrafficDefaults::default(),
        }
    }
}

/// 每条上行链路的发送包数，DRILL 要均衡的正是这个量。
#[derive(Debug, Clone, Serialize)]
pub struct UplinkReport {
    pub leaf: String,
    pub spine: String,
    pub tx_pkts: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub balancer: LoadBalancer,
    pub seed: u64,
    pub sim_time_ns: u64,
    pub events: u64,
    pub stats: Stats,
    pub mean_delay_us: f64,
    pub uplinks: Vec<UplinkReport>,
}

impl ScenarioSpec {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScenarioError> {
        let spec: ScenarioSpec = serde_json::from_str(raw)?;
        spec.validate()?;
        Ok(spec)
    }

    fn host_count(&self) -> usize {
        self.topology.leaves * self.topology.hosts_per_leaf
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let t = &self.topology;
        if t.leaves == 0 || t.spines == 0 || t.hosts_per_leaf == 0 {
            return Err(ScenarioError::Invalid(
                "leaves, spines and hosts_per_leaf must be positive".to_string(),
            ));
        }
        if t.link_bps == 0 {
            return Err(ScenarioError::Invalid("link_bps must be positive".to_string()));
        }
        if let LoadBalancer::Drill(cfg) = self.balancer {
            cfg.validate()?;
        }
        let hosts = self.host_count();
        for (i, f) in self.flows.iter().enumerate() {
            if f.src >= hosts || f.dst >= hosts {
                return Err(ScenarioError::Invalid(format!(
                    "flow {i}: host index out of range (fabric has {hosts} hosts)"
                )));
            }
            if f.src == f.dst {
                return Err(ScenarioError::Invalid(format!("flow {i}: src equals dst")));
            }
            if f.pkt_bytes == 0 {
                return Err(ScenarioError::Invalid(format!("flow {i}: pkt_bytes must be positive")));
            }
        }
        Ok(())
    }

    /// 已配置的 flow；未配置时每台主机向下一个 leaf 上同位置的主机发一条 flow。
    pub fn flows(&self) -> Vec<FlowSpec> {
        if !self.flows.is_empty() {
            return self.flows.clone();
        }
        let per_leaf = self.topology.hosts_per_leaf;
        let leaves = self.topology.leaves;
        let mut flows = Vec::new();
        for leaf in 0..leaves {
            for h in 0..per_leaf {
                let src = leaf * per_leaf + h;
                let dst = ((leaf + 1) % leaves) * per_leaf + h;
                if src == dst {
                    continue;
                }
                flows.push(FlowSpec {
                    src,
                    dst,
                    pkts: self.traffic.pkts,
                    pkt_bytes: self.traffic.pkt_bytes,
                    gap_us: self.traffic.gap_us,
                    start_us: 0,
                });
            }
        }
        flows
    }

    /// 构建拓扑并调度所有 flow，不运行。
    pub fn build(&self) -> Result<(Simulator, NetWorld, LeafSpineTopology), ScenarioError> {
        self.validate()?;
        let mut world = NetWorld::default();
        world.net.set_load_balancer(self.balancer, self.seed)?;
        let topo = build_leaf_spine(&mut world, &self.topology);

        let mut sim = Simulator::default();
        for (i, f) in self.flows().iter().enumerate() {
            sim.schedule(
                SimTime::from_micros(f.start_us),
                InjectFlow {
                    flow_id: i as u64 + 1,
                    src: topo.hosts[f.src],
                    dst: topo.hosts[f.dst],
                    pkt_bytes: f.pkt_bytes,
                    remaining: f.pkts,
                    gap: SimTime::from_micros(f.gap_us),
                },
            );
        }
        Ok((sim, world, topo))
    }

    pub fn run(&self) -> Result<RunReport, ScenarioError> {
        let (mut sim, mut world, topo) = self.build()?;
        info!(
            leaves = self.topology.leaves,
            spines = self.topology.spines,
            balancer = self.balancer.name(),
            until_ms = self.until_ms,
            "running leaf-spine scenario"
        );
        sim.run_until(SimTime::from_millis(self.until_ms), &mut world);
        Ok(self.report(&sim, &world, &topo))
    }

    fn report(&self, sim: &Simulator, world: &NetWorld, topo: &LeafSpineTopology) -> RunReport {
        let net = &world.net;
        let mut uplinks = Vec::with_capacity(topo.leaves.len() * topo.spines.len());
        for &leaf in &topo.leaves {
            for &spine in &topo.spines {
                let Some(link) = net.link_between(leaf, spine) else {
                    continue;
                };
                uplinks.push(UplinkReport {
                    leaf: net.node_name(leaf).unwrap_or_default().to_string(),
                    spine: net.node_name(spine).unwrap_or_default().to_string(),
                    tx_pkts: net.link(link).tx_pkts,
                });
            }
        }
        RunReport {
            balancer: self.balancer,
            seed: self.seed,
            sim_time_ns: sim.now().0,
            events: sim.executed(),
            stats: net.stats.clone(),
            mean_delay_us: net.stats.mean_delay_us(),
            uplinks,
        }
    }
}
