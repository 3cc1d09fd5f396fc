//! 运行统计

use serde::Serialize;

/// [`Network`](super::Network) 累积的计数器。
#[derive(Debug, Default, Clone, Serialize)]
pub struct Stats {
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    /// 出口队列满导致的尾丢弃
    pub dropped_pkts: u64,
    pub dropped_bytes: u64,
    /// 没有通往目的地的下一跳而被丢弃的包
    pub unroutable_pkts: u64,
    /// 已交付包的端到端时延之和
    pub total_delay_ns: u64,
    /// 入队时观察到的最大出口队列长度（包数）
    pub max_queue_len: usize,
    /// 入队时观察到的最大出口队列占用（字节）
    pub max_queue_bytes: u64,
}

impl Stats {
    /// 已交付包的平均端到端时延（微秒）。
    pub fn mean_delay_us(&self) -> f64 {
        if self.delivered_pkts == 0 {
            return 0.0;
        }
        self.total_delay_ns as f64 / self.delivered_pkts as f64 / 1_000.0
    }
}
