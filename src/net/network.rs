//! 网络拓扑与转发
//!
//! 持有节点、链路、等价路由表和统计信息。这一层包在决策引擎外面：
//! 先判断是否本地交付，再列出通往目的地的候选链路，交给节点的
//! [`Forwarder`] 选一条，然后在该链路上排队或直接发送。

use super::balancer::{Forwarder, LoadBalancer};
use super::deliver_packet::DeliverPacket;
use super::id::{LinkId, NodeId};
use super::link::Link;
use super::link_ready::LinkReady;
use super::node::{Host, Node, Switch};
use super::packet::Packet;
use super::routing::{RoutingTable, mix64};
use super::stats::Stats;
use crate::drill::{DrillEngine, DrillError, RandomSampler};
use crate::queue::{DEFAULT_QUEUE_PKTS, DropTailQueue, PacketQueue};
use crate::sim::{SimTime, Simulator};
use tracing::{debug, info, trace, warn};

const ROUTING_SALT: u64 = 0xC5A1_DA7A_5EED_1234;

pub struct Network {
    nodes: Vec<Option<Box<dyn Node>>>,
    links: Vec<Link>,
    routing: RoutingTable,
    balancer: LoadBalancer,
    /// 已校验的模板，各交换机的引擎由它派生
    drill_template: Option<DrillEngine>,
    seed: u64,
    queue_pkts: usize,
    next_pkt_id: u64,
    pub stats: Stats,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            routing: RoutingTable::new(ROUTING_SALT),
            balancer: LoadBalancer::Ecmp,
            drill_template: None,
            seed: 0,
            queue_pkts: DEFAULT_QUEUE_PKTS,
            next_pkt_id: 0,
            stats: Stats::default(),
        }
    }
}

impl Network {
    pub fn add_host(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Host::new(id, name))));
        self.routing.mark_dirty();
        id
    }

    /// 添加一台交换机，使用当前的负载均衡策略。
    pub fn add_switch(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let fwd = self.make_forwarder(id);
        self.nodes.push(Some(Box::new(Switch::new(id, name, fwd))));
        self.routing.mark_dirty();
        id
    }

    /// 添加 `from -> to` 的单向链路，出口队列容量取当前默认值。
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        let queue = Box::new(DropTailQueue::new(self.queue_pkts));
        self.links
            .push(Link::with_queue(from, to, latency, bandwidth_bps, queue));
        self.routing.mark_dirty();
        id
    }

    /// 之后新建链路的队列容量（包数）。
    pub fn set_queue_capacity_pkts(&mut self, pkts: usize) {
        self.queue_pkts = pkts;
    }

    /// 把现有和之后添加的所有交换机切换到 `balancer`。
    ///
    /// 每台 DRILL 交换机拿到一个由 `seed` 和节点 id 派生种子的私有采样器，
    /// 记忆从空开始。配置非法时返回错误，原策略保持不变。
    pub fn set_load_balancer(&mut self, balancer: LoadBalancer, seed: u64) -> Result<(), DrillError> {
        self.drill_template = match balancer {
            LoadBalancer::Drill(cfg) => Some(DrillEngine::with_seed(cfg, seed)?),
            LoadBalancer::Ecmp => None,
        };
        self.balancer = balancer;
        self.seed = seed;
        info!(balancer = balancer.name(), seed, "load balancer installed");

        for i in 0..self.nodes.len() {
            let fwd = self.make_forwarder(NodeId(i));
            if let Some(node) = self.nodes[i].as_mut() {
                node.set_forwarder(fwd);
            }
        }
        Ok(())
    }

    pub fn load_balancer(&self) -> LoadBalancer {
        self.balancer
    }

    fn make_forwarder(&self, id: NodeId) -> Forwarder {
        match &self.drill_template {
            Some(template) => {
                let sampler = RandomSampler::from_seed(mix64(self.seed ^ id.0 as u64));
                Forwarder::Drill(template.sibling(sampler))
            }
            None => Forwarder::Ecmp,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    /// 查找 `from -> to` 的链路。
    pub fn link_between(&self, from: NodeId, to: NodeId) -> Option<LinkId> {
        self.links
            .iter()
            .position(|l| l.from == from && l.to == to)
            .map(LinkId)
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0)?.as_deref().map(|n| n.name())
    }

    /// `id` 处安装的选择器；只有交换机才有。
    pub fn forwarder(&self, id: NodeId) -> Option<&Forwarder> {
        self.nodes.get(id.0)?.as_deref()?.forwarder()
    }

    /// `from` 通往 `dst` 的等价候选链路，顺序与转发时一致。
    pub fn candidates(&mut self, from: NodeId, dst: NodeId) -> Vec<LinkId> {
        self.routing.ensure_built(self.nodes.len(), &self.links);
        self.routing.next_hops(from, dst).to_vec()
    }

    pub fn make_packet(
        &mut self,
        flow_id: u64,
        size_bytes: u32,
        src: NodeId,
        dst: NodeId,
        now: SimTime,
    ) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        let mut pkt = Packet::new(id, flow_id, size_bytes, src, dst);
        pkt.sent_at = now;
        pkt
    }

    /// 把 `pkt` 交给节点 `to` 处理。
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        // 处理期间节点不在表中，它才能可变借用整个网络。
        let mut node = self.nodes[to.0].take().expect("node exists");
        node.on_packet(pkt, sim, self);
        self.nodes[to.0] = Some(node);
    }

    /// 没有自己选择器的节点（主机）的转发：按 flow 哈希选候选。
    pub fn forward_from(&mut self, from: NodeId, pkt: Packet, sim: &mut Simulator) {
        let mut fwd = Forwarder::Ecmp;
        self.forward_with(from, pkt, &mut fwd, sim);
    }

    /// 用 `fwd` 在 `from` 处选出口链路并发送 `pkt`。
    /// 没有任何候选的包记为不可路由并丢弃。
    pub fn forward_with(
        &mut self,
        from: NodeId,
        pkt: Packet,
        fwd: &mut Forwarder,
        sim: &mut Simulator,
    ) {
        self.routing.ensure_built(self.nodes.len(), &self.links);
        let cands = self.routing.next_hops(from, pkt.dst);
        let chosen = fwd.choose(from, pkt.dst, pkt.flow_id, cands, &self.links, &self.routing);
        match chosen {
            Ok(link_id) => {
                trace!(from = ?from, link = ?link_id, to = ?self.links[link_id.0].to, "next hop");
                self.transmit(link_id, pkt, sim);
            }
            Err(err) => {
                warn!(from = ?from, dst = ?pkt.dst, pkt_id = pkt.id, %err, "no route, dropping");
                self.stats.unroutable_pkts += 1;
            }
        }
    }

    /// 链路空闲则立即发送，否则排在正在发送的包后面；队列满则尾丢弃。
    pub fn transmit(&mut self, link_id: LinkId, pkt: Packet, sim: &mut Simulator) {
        let link = &mut self.links[link_id.0];
        if !link.busy {
            self.start_tx(link_id, pkt, sim);
            return;
        }
        let size = pkt.size_bytes as u64;
        match link.queue.enqueue(pkt) {
            Ok(()) => {
                let len = link.queue.len();
                let bytes = link.queue.bytes();
                self.stats.max_queue_len = self.stats.max_queue_len.max(len);
                self.stats.max_queue_bytes = self.stats.max_queue_bytes.max(bytes);
                trace!(link = ?link_id, queue_len = len, queue_bytes = bytes, "queued");
            }
            Err(dropped) => {
                debug!(
                    link = ?link_id,
                    pkt_id = dropped.id,
                    capacity = link.queue.capacity_pkts(),
                    "queue full, tail drop"
                );
                self.stats.dropped_pkts += 1;
                self.stats.dropped_bytes += size;
            }
        }
    }

    fn start_tx(&mut self, link_id: LinkId, pkt: Packet, sim: &mut Simulator) {
        let link = &mut self.links[link_id.0];
        let depart = sim.now().saturating_add(link.tx_time(pkt.size_bytes));
        let arrive = depart.saturating_add(link.latency);
        link.busy = true;
        link.tx_pkts += 1;
        let to = link.to;
        trace!(link = ?link_id, pkt_id = pkt.id, depart = ?depart, arrive = ?arrive, "tx start");
        sim.schedule(depart, LinkReady { link_id });
        sim.schedule(arrive, DeliverPacket { to, pkt: pkt.advance() });
    }

    /// 链路发送完毕，取出下一个排队的包继续发送。
    pub fn on_link_ready(&mut self, link_id: LinkId, sim: &mut Simulator) {
        let link = &mut self.links[link_id.0];
        link.busy = false;
        if let Some(pkt) = link.queue.dequeue() {
            self.start_tx(link_id, pkt, sim);
        }
    }

    pub(crate) fn on_delivered(&mut self, pkt: Packet, now: SimTime) {
        let delay = now.saturating_sub(pkt.sent_at);
        trace!(pkt_id = pkt.id, flow_id = pkt.flow_id, hops = pkt.hops_taken, delay = ?delay, "delivered");
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += pkt.size_bytes as u64;
        self.stats.total_delay_ns = self.stats.total_delay_ns.saturating_add(delay.0);
    }
}
