//! 引擎参数

use serde::{Deserialize, Serialize};

use super::error::DrillError;

/// DRILL(d, m) 参数，在引擎的整个生命周期内固定不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// 每次决策独立均匀抽样的次数（有放回）。可以大于候选数。
    pub d: usize,
    /// 记住的历史选择个数，最近的在前。
    pub memory: usize,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self { d: 2, memory: 1 }
    }
}

impl DrillConfig {
    pub fn new(d: usize, memory: usize) -> Self {
        Self { d, memory }
    }

    /// 校验参数。`d == 0` 合法，表示只看记忆。
    pub fn validate(&self) -> Result<(), DrillError> {
        if self.memory == 0 {
            return Err(DrillError::InvalidConfig(
                "memory must hold at least one hop".to_string(),
            ));
        }
        Ok(())
    }
}
