//! 链路

use super::id::NodeId;
use crate::drill::CandidateLink;
use crate::queue::{DEFAULT_QUEUE_PKTS, DropTailQueue, PacketQueue};
use crate::sim::SimTime;

/// 单向点到点链路，出口队列位于 `from` 端。
#[derive(Debug)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub latency: SimTime,
    pub bandwidth_bps: u64,
    /// 正在发送一个包，新到的包在 `queue` 中等待
    pub busy: bool,
    pub queue: Box<dyn PacketQueue>,
    /// 在该链路上开始发送的包数
    pub tx_pkts: u64,
}

impl Link {
    pub fn new(from: NodeId, to: NodeId, latency: SimTime, bandwidth_bps: u64) -> Self {
        Self::with_queue(
            from,
            to,
            latency,
            bandwidth_bps,
            Box::new(DropTailQueue::new(DEFAULT_QUEUE_PKTS)),
        )
    }

    pub fn with_queue(
        from: NodeId,
        to: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
        queue: Box<dyn PacketQueue>,
    ) -> Self {
        Self {
            from,
            to,
            latency,
            bandwidth_bps,
            busy: false,
            queue,
            tx_pkts: 0,
        }
    }

    /// `bytes` 字节在该链路上的发送时间，向上取整到纳秒。
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        if self.bandwidth_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (bytes as u128).saturating_mul(8);
        let bps = self.bandwidth_bps as u128;
        let nanos = (bits.saturating_mul(1_000_000_000) + (bps - 1)) / bps;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}

impl CandidateLink for Link {
    fn queue_len(&self) -> usize {
        self.queue.len()
    }

    fn queue_capacity(&self) -> usize {
        self.queue.capacity_pkts()
    }
}
