//! 链路出口队列
//!
//! 只建模尾丢弃。容量按包数计，与 DRILL 实验中交换机缓存的常见配置一致（如 `50p`）。

use crate::net::Packet;

mod drop_tail;

pub use drop_tail::DropTailQueue;

/// 默认出口缓存（包数）
pub const DEFAULT_QUEUE_PKTS: usize = 50;

/// 链路前的 FIFO 包缓存
pub trait PacketQueue: std::fmt::Debug + Send {
    /// 追加 `pkt`；缓存满时通过 `Err` 原样返回。
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet>;
    fn dequeue(&mut self) -> Option<Packet>;

    /// 等待中的包数（不含正在线路上发送的那个）
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn bytes(&self) -> u64;
    fn capacity_pkts(&self) -> usize;
}
