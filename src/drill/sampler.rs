//! 下一跳抽样的随机源
//!
//! 每个引擎独占自己的采样器，决策点之间不共享随机数生成器。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 引擎做 `d` 次抽样时使用的均匀下标源。
pub trait HopSampler {
    /// 返回 `[0, n)` 中的下标；不会以 `n == 0` 调用。
    fn sample(&mut self, n: usize) -> usize;
}

/// 基于私有 `SmallRng` 的伪随机采样器
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: SmallRng,
}

impl RandomSampler {
    /// 可复现的采样器
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// 用操作系统熵做种子
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl HopSampler for RandomSampler {
    fn sample(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// 循环回放一组固定下标。
///
/// 每个值在抽样时对候选数取模，因此为大拓扑写的脚本在小拓扑上仍给出合法下标。
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    script: Vec<usize>,
    pos: usize,
}

impl ScriptedSampler {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            pos: 0,
        }
    }

    /// 已抽样的次数
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl HopSampler for ScriptedSampler {
    fn sample(&mut self, n: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let v = self.script[self.pos % self.script.len()];
        self.pos = self.pos.wrapping_add(1);
        v % n
    }
}
