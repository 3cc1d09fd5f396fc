//! World（仿真状态）trait

use super::simulator::Simulator;
use std::any::Any;

/// 事件操作的状态；事件把它 downcast 成自己需要的具体类型。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// 每执行完一个事件后调用
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
