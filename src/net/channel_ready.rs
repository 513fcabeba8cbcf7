//! 信道就绪事件（驱动队列出队）

use super::id::ChannelId;
use super::net_world::NetWorld;
use crate::sim::{Event, Simulator, World};

/// 事件：信道完成一次序列化发送后在 depart 时刻触发，尝试发送队列中的下一个 packet。
#[derive(Debug)]
pub struct ChannelReady {
    pub channel: ChannelId,
}

impl Event for ChannelReady {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.on_channel_ready(self.channel, sim);
    }
}
