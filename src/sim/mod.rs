//! 离散事件仿真核心
//!
//! 仿真时间、事件与 world 的 trait，以及驱动它们的事件循环。

mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

pub use event::Event;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
