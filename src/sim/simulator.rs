//! 事件循环

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护时钟与待执行事件堆。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    executed: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 堆中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 已执行的事件数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 调度 `ev` 在 `at` 执行；同一时刻的事件按调度顺序执行。
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(
            now = ?self.now,
            at = ?at,
            seq,
            event_type = std::any::type_name::<E>(),
            "schedule"
        );
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
    }

    /// 执行所有时间 `<= until` 的事件，然后把时钟推进到 `until`。
    #[tracing::instrument(skip(self, world))]
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        info!(now = ?self.now, pending = self.q.len(), "run until");
        while let Some(top) = self.q.peek() {
            if top.at > until {
                break;
            }
            let Some(item) = self.q.pop() else { break };
            self.step(item, world);
        }
        self.now = self.now.max(until);
        info!(now = ?self.now, executed = self.executed, pending = self.q.len(), "stopped");
    }

    /// 运行直到事件队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!(now = ?self.now, pending = self.q.len(), "run");
        while let Some(item) = self.q.pop() {
            self.step(item, world);
        }
        info!(now = ?self.now, executed = self.executed, "event queue drained");
    }

    fn step(&mut self, item: ScheduledEvent, world: &mut dyn World) {
        self.now = item.at;
        self.executed += 1;
        debug!(now = ?self.now, seq = item.seq, remaining = self.q.len(), "execute");
        item.ev.execute(self, world);
        world.on_tick(self);
    }
}
