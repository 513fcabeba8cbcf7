//! 网络模拟模块
//!
//! 节点、点对点链路（两个方向的信道）、数据包、路由与转发事件。

mod channel_ready;
mod deliver_packet;
mod id;
mod link;
mod net_world;
mod network;
mod node;
mod packet;
mod rate;
mod routing;
mod stats;

pub use channel_ready::ChannelReady;
pub use deliver_packet::DeliverPacket;
pub use id::{ChannelId, FlowId, LinkId, NodeId};
pub use link::{Channel, Link};
pub use net_world::NetWorld;
pub use network::Network;
pub use node::Node;
pub use packet::{FlowTuple, IPV4_HEADER_BYTES, PPP_HEADER_BYTES, Packet, TransportKind};
pub use rate::{DataRate, ParseDataRateError};
pub use routing::RoutingTable;
pub use stats::{ChannelStats, Stats};
