//! 节点
//!
//! 主机是流量的终点，也把自己发出的包送上上行链路。交换机是决策点：
//! 每台持有一个 [`Forwarder`]，为转发的每个包选择出口链路。

use super::balancer::Forwarder;
use super::id::NodeId;
use super::network::Network;
use super::packet::Packet;
use crate::sim::Simulator;
use tracing::trace;

pub trait Node: Send {
    fn id(&self) -> NodeId;

    fn name(&self) -> &str;

    /// 处理到达本节点的包
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network);

    /// 安装新的下一跳选择器；不做决策的节点忽略。
    fn set_forwarder(&mut self, _fwd: Forwarder) {}

    fn forwarder(&self) -> Option<&Forwarder> {
        None
    }
}

#[derive(Debug)]
pub struct Host {
    id: NodeId,
    name: String,
}

impl Host {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Node for Host {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        if pkt.dst == self.id {
            net.on_delivered(pkt, sim.now());
        } else {
            trace!(host = %self.name, pkt_id = pkt.id, "host sending");
            net.forward_from(self.id, pkt, sim);
        }
    }
}

#[derive(Debug)]
pub struct Switch {
    id: NodeId,
    name: String,
    fwd: Forwarder,
}

impl Switch {
    pub fn new(id: NodeId, name: impl Into<String>, fwd: Forwarder) -> Self {
        Self {
            id,
            name: name.into(),
            fwd,
        }
    }
}

impl Node for Switch {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip(self, pkt, sim, net), fields(switch = %self.name, pkt_id = pkt.id, dst = ?pkt.dst))]
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        if pkt.dst == self.id {
            net.on_delivered(pkt, sim.now());
            return;
        }
        net.forward_with(self.id, pkt, &mut self.fwd, sim);
    }

    fn set_forwarder(&mut self, fwd: Forwarder) {
        self.fwd = fwd;
    }

    fn forwarder(&self) -> Option<&Forwarder> {
        Some(&self.fwd)
    }
}
