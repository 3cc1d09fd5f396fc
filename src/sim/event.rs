//! 事件 trait

use super::simulator::Simulator;
use super::world::World;

/// 在某个仿真时刻发生的事。接收 `self: Box<Self>`，
/// 事件可以把负载（如数据包）移交给 world。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
