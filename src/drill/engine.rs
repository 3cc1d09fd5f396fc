//! DRILL 决策引擎

use tracing::{debug, trace};

use super::config::DrillConfig;
use super::error::DrillError;
use super::sampler::{HopSampler, RandomSampler};

/// 评估集合预分配的上限；更大的 `d` 按需增长。
const EVAL_PREALLOC: usize = 64;

/// 交给引擎的一条出链路的只读视图。
///
/// 只在一次决策期间被查询，决策结束后不会保留。
pub trait CandidateLink {
    /// 该链路出口队列中正在等待的包数。
    fn queue_len(&self) -> usize;
    /// 队列容量（包数），仅用于日志。
    fn queue_capacity(&self) -> usize;
}

impl<T: CandidateLink + ?Sized> CandidateLink for &T {
    fn queue_len(&self) -> usize {
        (**self).queue_len()
    }

    fn queue_capacity(&self) -> usize {
        (**self).queue_capacity()
    }
}

/// 单个决策点的 DRILL 状态：参数、私有采样器、记住的下一跳。
#[derive(Debug, Clone)]
pub struct DrillEngine<S: HopSampler = RandomSampler> {
    config: DrillConfig,
    sampler: S,
    /// 最近的在前，最多 `config.memory` 个。
    memory: Vec<usize>,
    /// 评估集合的复用缓冲区
    eval: Vec<usize>,
}

fn eval_capacity(config: &DrillConfig) -> usize {
    config.d.saturating_add(config.memory).min(EVAL_PREALLOC)
}

impl DrillEngine<RandomSampler> {
    /// 使用带种子的 `RandomSampler` 构造。
    pub fn with_seed(config: DrillConfig, seed: u64) -> Result<Self, DrillError> {
        Self::new(config, RandomSampler::from_seed(seed))
    }
}

impl<S: HopSampler> DrillEngine<S> {
    pub fn new(config: DrillConfig, sampler: S) -> Result<Self, DrillError> {
        config.validate()?;
        Ok(Self {
            config,
            sampler,
            memory: Vec::with_capacity(config.memory.min(EVAL_PREALLOC)),
            eval: Vec::with_capacity(eval_capacity(&config)),
        })
    }

    /// 以相同参数创建一个新引擎：记忆为空，采样器独立。
    /// `self` 构造时参数已校验过。
    pub fn sibling<T: HopSampler>(&self, sampler: T) -> DrillEngine<T> {
        DrillEngine {
            config: self.config,
            sampler,
            memory: Vec::with_capacity(self.config.memory.min(EVAL_PREALLOC)),
            eval: Vec::with_capacity(eval_capacity(&self.config)),
        }
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    /// 之前决策记住的下一跳，最近的在前。
    pub fn memory(&self) -> &[usize] {
        &self.memory
    }

    /// 在 `d` 个随机样本和记住的下一跳中选出口队列最短的候选。
    ///
    /// 先按抽样顺序评估样本，再评估记忆；队列长度相同时先出现的胜出。
    /// 超出当前候选范围的记忆项只在本次决策中忽略。出错时记忆不变。
    pub fn select_next_hop<C: CandidateLink>(
        &mut self,
        candidates: &[C],
    ) -> Result<usize, DrillError> {
        let n = candidates.len();
        if n == 0 {
            return Err(DrillError::NoCandidates);
        }

        debug!(candidates = n, d = self.config.d, memory = ?self.memory, "drill decision");

        self.eval.clear();
        for i in 0..self.config.d {
            let idx = self.sampler.sample(n);
            debug_assert!(idx < n, "sampler returned {idx} for n={n}");
            trace!(draw = i, next_hop = idx, "random choice");
            self.eval.push(idx);
        }
        for &mem in &self.memory {
            if mem < n {
                trace!(next_hop = mem, "memory choice");
                self.eval.push(mem);
            } else {
                trace!(next_hop = mem, candidates = n, "memory out of range, skipped");
            }
        }
        if self.eval.is_empty() {
            // d == 0 且还没有可用的记忆
            self.eval.push(0);
        }

        let mut best = self.eval[0];
        let mut min_q = usize::MAX;
        for &idx in &self.eval {
            let link = &candidates[idx];
            let len = link.queue_len();
            trace!(
                next_hop = idx,
                queue_len = len,
                queue_capacity = link.queue_capacity(),
                "queue length"
            );
            if len < min_q {
                min_q = len;
                best = idx;
            }
        }

        self.remember(best);
        debug!(next_hop = best, queue_len = min_q, "selected next hop");
        Ok(best)
    }

    #[cfg(test)]
    pub(crate) fn set_memory(&mut self, hops: &[usize]) {
        self.memory.clear();
        self.memory.extend(hops.iter().copied().take(self.config.memory));
    }

    fn remember(&mut self, chosen: usize) {
        self.memory.retain(|&h| h != chosen);
        self.memory.insert(0, chosen);
        self.memory.truncate(self.config.memory);
    }
}
