//! 网络拓扑管理
//!
//! 持有节点、点对点链路与单向信道，负责地址表、路由、排队与转发，
//! 并在发送/丢弃/到达处调用被动测量钩子。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use super::channel_ready::ChannelReady;
use super::deliver_packet::DeliverPacket;
use super::id::{ChannelId, FlowId, LinkId, NodeId};
use super::link::{Channel, Link};
use super::node::Node;
use super::packet::{FlowTuple, Packet};
use super::rate::DataRate;
use super::routing::RoutingTable;
use super::stats::Stats;
use crate::flowmon::FlowMonitor;
use crate::queue::UNBOUNDED_BYTES;
use crate::sim::{SimTime, Simulator};
use tracing::{debug, trace, warn};

/// 网络拓扑
pub struct Network {
    nodes: Vec<Node>,
    links: Vec<Link>,
    channels: Vec<Channel>,
    edges: HashMap<(NodeId, NodeId), ChannelId>,
    addresses: HashMap<Ipv4Addr, NodeId>,
    routing: RoutingTable,
    next_pkt_id: u64,
    default_queue_bytes: u64,
    pub stats: Stats,
    /// 可选的流测量器；挂上后由网络在发送/丢弃/到达处喂数据
    pub flowmon: Option<FlowMonitor>,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            channels: Vec::new(),
            edges: HashMap::new(),
            addresses: HashMap::new(),
            routing: RoutingTable::default(),
            next_pkt_id: 0,
            default_queue_bytes: UNBOUNDED_BYTES,
            stats: Stats::default(),
            flowmon: None,
        }
    }
}

impl Network {
    /// 添加节点
    pub fn add_node(&mut self, tier: &str, index: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, tier, index));
        id
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(id.0)
    }

    /// 用点对点链路连接两个已存在的节点（创建两个方向的信道）。
    ///
    /// # Panics
    ///
    /// 任一端点尚未创建，或两端是同一个节点。
    pub fn connect(
        &mut self,
        a: NodeId,
        b: NodeId,
        rate: DataRate,
        delay: SimTime,
        profile: &str,
    ) -> LinkId {
        assert!(
            a.0 < self.nodes.len() && b.0 < self.nodes.len(),
            "cannot wire {a} <-> {b}: node not created ({} nodes exist)",
            self.nodes.len()
        );
        assert_ne!(a, b, "a point-to-point link needs two distinct nodes");

        let id = LinkId(self.links.len());
        let ab = ChannelId(self.channels.len());
        let ba = ChannelId(self.channels.len() + 1);
        let q = self.default_queue_bytes;
        self.channels.push(Channel::new(ab, id, a, b, rate, delay, q));
        self.channels.push(Channel::new(ba, id, b, a, rate, delay, q));
        self.edges.insert((a, b), ab);
        self.edges.insert((b, a), ba);
        self.links.push(Link {
            id,
            a,
            b,
            rate,
            delay,
            profile: profile.to_string(),
            channels: [ab, ba],
        });
        self.nodes[a.0].attach_link(id);
        self.nodes[b.0].attach_link(id);
        self.routing.mark_dirty();

        trace!(link = id.0, %a, %b, %rate, delay = %delay, profile, "创建点对点链路");
        id
    }

    /// 设置所有（现有与之后创建的）信道的出口队列容量
    pub fn set_queue_capacity_bytes(&mut self, bytes: u64) {
        self.default_queue_bytes = bytes;
        for ch in &mut self.channels {
            ch.set_queue_capacity_bytes(bytes);
        }
    }

    /// 把地址绑定到节点在 `link` 上的接口。
    ///
    /// # Panics
    ///
    /// 节点不是链路端点，或地址已被绑定过。
    pub fn bind_address(&mut self, node: NodeId, link: LinkId, addr: Ipv4Addr) {
        let is_end = self
            .links
            .get(link.0)
            .is_some_and(|l| l.a == node || l.b == node);
        assert!(is_end, "{node} is not an endpoint of link {}", link.0);
        let prev = self.addresses.insert(addr, node);
        assert!(prev.is_none(), "address {addr} bound twice");
        self.nodes[node.0].bind_address(addr);
    }

    pub fn primary_address(&self, node: NodeId) -> Option<Ipv4Addr> {
        self.node(node).and_then(Node::primary_address)
    }

    pub fn node_by_address(&self, addr: Ipv4Addr) -> Option<NodeId> {
        self.addresses.get(&addr).copied()
    }

    /// 按当前拓扑填充路由表（拓扑未变化时为空操作）
    pub fn populate_routing_tables(&mut self) {
        if self.routing.is_built() {
            return;
        }
        let n = self.nodes.len();
        let mut adj = vec![Vec::new(); n];
        let mut rev_adj = vec![Vec::new(); n];
        for ch in &self.channels {
            adj[ch.from.0].push(ch.to);
            rev_adj[ch.to.0].push(ch.from);
        }
        self.routing.ensure_built(&adj, &rev_adj);
        debug!(nodes = n, channels = self.channels.len(), "路由表已填充");
    }

    /// 某条流从 `from` 出发去 `dst` 的下一跳
    pub fn next_hop(&mut self, from: NodeId, dst: NodeId, flow: FlowId) -> Option<NodeId> {
        self.populate_routing_tables();
        self.routing.next_hop(from, dst, flow)
    }

    /// 某条流在 `from` 处的出口信道速率
    pub fn egress_rate(&mut self, from: NodeId, dst: NodeId, flow: FlowId) -> Option<DataRate> {
        let nh = self.next_hop(from, dst, flow)?;
        let ch = self.edges.get(&(from, nh))?;
        Some(self.channels[ch.0].rate)
    }

    /// 创建数据包
    pub fn make_packet(&mut self, flow_id: FlowId, tuple: FlowTuple, payload_bytes: u32, now: SimTime) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet::new(id, flow_id, tuple, payload_bytes, now)
    }

    /// 应用层发出一个 packet：计入发送统计并从源节点开始转发
    pub fn send(&mut self, pkt: Packet, sim: &mut Simulator) {
        self.stats.sent_pkts += 1;
        if let Some(fm) = &mut self.flowmon {
            fm.on_tx(&pkt, sim.now());
        }
        let src = pkt.src();
        self.forward_from(src, pkt, sim);
    }

    /// packet 经 `via` 信道到达节点 `to`。到达目的地时返回该 packet，交给应用层。
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id, flow = pkt.flow_id.0))]
    pub fn on_arrival(
        &mut self,
        to: NodeId,
        via: Option<ChannelId>,
        pkt: Packet,
        sim: &mut Simulator,
    ) -> Option<Packet> {
        if let Some(ch) = via {
            let st = &mut self.channels[ch.0].stats;
            st.rx_pkts += 1;
            st.rx_bytes += pkt.size_bytes as u64;
        }
        if to == pkt.dst() {
            Some(self.on_delivered(pkt, sim.now()))
        } else {
            self.forward_from(to, pkt, sim);
            None
        }
    }

    /// 从节点 `at` 转发数据包
    pub fn forward_from(&mut self, at: NodeId, pkt: Packet, sim: &mut Simulator) {
        let Some(nh) = self.next_hop(at, pkt.dst(), pkt.flow_id) else {
            warn!(%at, dst = %pkt.dst(), "无路由，丢弃数据包");
            self.record_drop(&pkt);
            return;
        };
        let ch = self.edges[&(at, nh)];
        self.transmit(ch, pkt.advance(), sim);
    }

    fn transmit(&mut self, ch_id: ChannelId, pkt: Packet, sim: &mut Simulator) {
        let ch = &mut self.channels[ch_id.0];
        if !ch.transmitting {
            self.start_tx(ch_id, pkt, sim);
            return;
        }
        if let Err(pkt) = ch.enqueue(pkt) {
            ch.stats.dropped_pkts += 1;
            ch.stats.dropped_bytes += pkt.size_bytes as u64;
            trace!(channel = ch_id.0, pkt_id = pkt.id, "队列已满，尾丢弃");
            self.record_drop(&pkt);
        }
    }

    fn start_tx(&mut self, ch_id: ChannelId, pkt: Packet, sim: &mut Simulator) {
        let ch = &mut self.channels[ch_id.0];
        let tx = ch.tx_time(pkt.size_bytes);
        let depart = sim.now().after(tx);
        let arrive = depart.after(ch.delay);
        ch.transmitting = true;
        ch.stats.tx_pkts += 1;
        ch.stats.tx_bytes += pkt.size_bytes as u64;
        ch.stats.busy_ns = ch.stats.busy_ns.saturating_add(tx.0);
        let to = ch.to;

        sim.schedule(depart, ChannelReady { channel: ch_id });
        sim.schedule(
            arrive,
            DeliverPacket {
                to,
                via: Some(ch_id),
                pkt,
            },
        );
    }

    /// 信道完成一次序列化发送：取队头继续发送
    pub(crate) fn on_channel_ready(&mut self, ch_id: ChannelId, sim: &mut Simulator) {
        let ch = &mut self.channels[ch_id.0];
        ch.transmitting = false;
        if let Some(next) = ch.dequeue() {
            self.start_tx(ch_id, next, sim);
        }
    }

    fn record_drop(&mut self, pkt: &Packet) {
        self.stats.dropped_pkts += 1;
        self.stats.dropped_bytes += pkt.size_bytes as u64;
        if let Some(fm) = &mut self.flowmon {
            fm.on_drop(pkt);
        }
    }

    fn on_delivered(&mut self, pkt: Packet, now: SimTime) -> Packet {
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += pkt.size_bytes as u64;
        if let Some(fm) = &mut self.flowmon {
            fm.on_rx(&pkt, now);
        }
        trace!(pkt_id = pkt.id, hops = pkt.hops_taken, "数据包送达目的地");
        pkt
    }
}
