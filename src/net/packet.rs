//! 数据包

use super::id::NodeId;
use crate::sim::SimTime;

/// 逐跳路由的数据包：下一跳在每个节点处选择，不随包携带。
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub flow_id: u64,
    pub size_bytes: u32,
    pub src: NodeId,
    pub dst: NodeId,
    /// 已经过的链路数
    pub hops_taken: u32,
    /// 源端注入的时间
    pub sent_at: SimTime,
}

impl Packet {
    pub fn new(id: u64, flow_id: u64, size_bytes: u32, src: NodeId, dst: NodeId) -> Self {
        Self {
            id,
            flow_id,
            size_bytes,
            src,
            dst,
            hops_taken: 0,
            sent_at: SimTime::ZERO,
        }
    }

    /// 经过一条链路
    pub fn advance(mut self) -> Self {
        self.hops_taken = self.hops_taken.saturating_add(1);
        self
    }
}
