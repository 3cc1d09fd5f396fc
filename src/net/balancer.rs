//! 负载均衡策略
//!
//! [`LoadBalancer`] 是配置层面的策略；[`Forwarder`] 是由它派生出的每台交换机
//! 自己的状态。每台 DRILL 交换机独占一个引擎。

use serde::{Deserialize, Serialize};

use super::id::{LinkId, NodeId};
use super::link::Link;
use super::routing::RoutingTable;
use crate::drill::{DrillConfig, DrillEngine, DrillError};

/// 交换机处使用的下一跳策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadBalancer {
    /// 逐包 DRILL(d, m)
    Drill(DrillConfig),
    /// 按 flow 哈希到等价链路
    Ecmp,
}

impl Default for LoadBalancer {
    fn default() -> Self {
        LoadBalancer::Drill(DrillConfig::default())
    }
}

impl LoadBalancer {
    pub fn name(&self) -> &'static str {
        match self {
            LoadBalancer::Drill(_) => "drill",
            LoadBalancer::Ecmp => "ecmp",
        }
    }
}

/// 每台交换机的下一跳选择器。
#[derive(Debug, Clone)]
pub enum Forwarder {
    Ecmp,
    Drill(DrillEngine),
}

impl Forwarder {
    /// 为 `at` 处发往 `dst`、属于 `flow_id` 的包从 `cands` 中选一条出链路。
    ///
    /// 只有一个候选时直接返回它，不经过策略：没有选择就不算一次决策，
    /// DRILL 的记忆只记录真正有多条路径时的选择。
    pub fn choose(
        &mut self,
        at: NodeId,
        dst: NodeId,
        flow_id: u64,
        cands: &[LinkId],
        links: &[Link],
        routing: &RoutingTable,
    ) -> Result<LinkId, DrillError> {
        if let [only] = cands {
            return Ok(*only);
        }
        match self {
            Forwarder::Ecmp => routing
                .pick_ecmp(at, dst, flow_id, cands)
                .ok_or(DrillError::NoCandidates),
            Forwarder::Drill(engine) => {
                let views: Vec<&Link> = cands.iter().map(|l| &links[l.0]).collect();
                let idx = engine.select_next_hop(&views)?;
                Ok(cands[idx])
            }
        }
    }
}
