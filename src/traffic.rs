//! 恒定速率发包源

use serde::{Deserialize, Serialize};

use crate::net::{NetWorld, NodeId};
use crate::sim::{Event, SimTime, Simulator, World};

/// 一条 flow：主机 `src` 向 `dst` 等间隔发送 `pkts` 个包。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSpec {
    pub src: usize,
    pub dst: usize,
    #[serde(default = "default_pkts")]
    pub pkts: u64,
    #[serde(default = "default_pkt_bytes")]
    pub pkt_bytes: u32,
    #[serde(default = "default_gap_us")]
    pub gap_us: u64,
    #[serde(default)]
    pub start_us: u64,
}

fn default_pkts() -> u64 {
    1000
}

fn default_pkt_bytes() -> u32 {
    1500
}

fn default_gap_us() -> u64 {
    200
}

/// 在 `src` 注入 flow 的下一个包，并重新调度自身。
#[derive(Debug)]
pub struct InjectFlow {
    pub flow_id: u64,
    pub src: NodeId,
    pub dst: NodeId,
    pub pkt_bytes: u32,
    pub remaining: u64,
    pub gap: SimTime,
}

impl Event for InjectFlow {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let mut me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        if me.remaining == 0 {
            return;
        }

        let pkt = w
            .net
            .make_packet(me.flow_id, me.pkt_bytes, me.src, me.dst, sim.now());
        w.net.forward_from(me.src, pkt, sim);

        me.remaining -= 1;
        if me.remaining > 0 {
            let next_at = sim.now().saturating_add(me.gap);
            sim.schedule(next_at, me);
        }
    }
}
