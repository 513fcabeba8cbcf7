//! 链路类型
//!
//! `Link` 是连接两个节点的点对点链路；它由两个方向的 `Channel` 实现，
//! 每个方向有自己的发送时钟、出口队列与计数器。

use super::id::{ChannelId, LinkId, NodeId};
use super::packet::Packet;
use super::rate::DataRate;
use super::stats::ChannelStats;
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::SimTime;

/// 点对点链路。创建后不可变。
#[derive(Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    /// 安装顺序中的第一个端点（地址块中的 `.1`）
    pub a: NodeId,
    /// 安装顺序中的第二个端点（地址块中的 `.2`）
    pub b: NodeId,
    pub rate: DataRate,
    pub delay: SimTime,
    /// 实例化该链路的层级配置名
    pub profile: String,
    /// `[a->b, b->a]`
    pub channels: [ChannelId; 2],
}

/// 单向信道
#[derive(Debug)]
pub struct Channel {
    pub id: ChannelId,
    pub link: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    pub rate: DataRate,
    pub delay: SimTime,
    /// 是否正在序列化发送一个 packet
    pub(crate) transmitting: bool,
    pub(crate) queue: Box<dyn PacketQueue>,
    pub stats: ChannelStats,
}

impl Channel {
    pub(crate) fn new(
        id: ChannelId,
        link: LinkId,
        from: NodeId,
        to: NodeId,
        rate: DataRate,
        delay: SimTime,
        queue_bytes: u64,
    ) -> Self {
        Self {
            id,
            link,
            from,
            to,
            rate,
            delay,
            transmitting: false,
            queue: Box::new(DropTailQueue::new(queue_bytes)),
            stats: ChannelStats::default(),
        }
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        self.rate.tx_time(bytes)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity_bytes(&self) -> u64 {
        self.queue.capacity_bytes()
    }

    pub(crate) fn set_queue_capacity_bytes(&mut self, bytes: u64) {
        self.queue = Box::new(DropTailQueue::new(bytes));
    }

    /// 入队；队列满则把 packet 原样退回
    pub(crate) fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet> {
        let res = self.queue.enqueue(pkt);
        self.stats.max_queue_bytes = self.stats.max_queue_bytes.max(self.queue.peak_bytes());
        res
    }

    pub(crate) fn dequeue(&mut self) -> Option<Packet> {
        self.queue.dequeue()
    }
}
