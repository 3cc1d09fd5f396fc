//! 链路就绪事件

use super::id::LinkId;
use super::net_world::NetWorld;
use crate::sim::{Event, Simulator, World};

/// 链路发完一个包时触发，下一个排队的包可以开始发送。
#[derive(Debug)]
pub struct LinkReady {
    pub link_id: LinkId,
}

impl Event for LinkReady {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let LinkReady { link_id } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.on_link_ready(link_id, sim);
    }
}
