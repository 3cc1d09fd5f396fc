//! 网络模型
//!
//! 节点、链路、数据包，以及位于仿真器和 DRILL 决策引擎之间的转发层。

mod balancer;
mod deliver_packet;
mod id;
mod link;
mod link_ready;
mod net_world;
mod network;
mod node;
mod packet;
mod routing;
mod stats;

pub use balancer::{Forwarder, LoadBalancer};
pub use deliver_packet::DeliverPacket;
pub use id::{LinkId, NodeId};
pub use link::Link;
pub use link_ready::LinkReady;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Host, Node, Switch};
pub use packet::Packet;
pub use routing::RoutingTable;
pub use stats::Stats;
