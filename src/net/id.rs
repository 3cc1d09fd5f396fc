//! 标识符

use serde::{Deserialize, Serialize};

/// 节点在 [`Network`](super::Network) 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 单向链路在 [`Network`](super::Network) 中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub usize);
