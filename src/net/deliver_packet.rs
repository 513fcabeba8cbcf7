//! 数据包到达事件

use super::id::{ChannelId, NodeId};
use super::net_world::NetWorld;
use super::packet::Packet;
use crate::sim::{Event, Simulator, World};

/// 事件：packet 经信道 `via` 到达节点 `to`（传播时延结束）。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: NodeId,
    pub via: Option<ChannelId>,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, via, pkt } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        if let Some(pkt) = w.net.on_arrival(to, via, pkt, sim) {
            w.apps.on_receive(&pkt, sim.now());
        }
    }
}
