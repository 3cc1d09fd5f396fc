//! 网络仿真的 World 实现

use super::network::Network;
use crate::sim::World;
use std::any::Any;

/// 持有 [`Network`] 的 World
#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
