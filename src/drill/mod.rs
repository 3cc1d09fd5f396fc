//! DRILL 下一跳选择
//!
//! 单个决策点上的逐包负载均衡：均匀随机抽取 `d` 条候选链路，加上之前决策
//! 记住的下一跳，选出口队列最短的一条。
//!
//! 引擎不了解包、路由和仿真器。转发层传入一组 [`CandidateLink`]，拿回一个下标。

mod config;
mod engine;
mod error;
mod sampler;

pub use config::DrillConfig;
pub use engine::{CandidateLink, DrillEngine};
pub use error::DrillError;
pub use sampler::{HopSampler, RandomSampler, ScriptedSampler};
