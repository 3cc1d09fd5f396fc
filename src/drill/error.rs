//! 决策引擎错误

/// [`DrillEngine`](super::DrillEngine) 返回的错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrillError {
    /// 以空候选列表调用 `select_next_hop`。调用方应退回其他路由或报告 "no route"。
    #[error("no candidate next hops")]
    NoCandidates,
    #[error("invalid drill configuration: {0}")]
    InvalidConfig(String),
}
