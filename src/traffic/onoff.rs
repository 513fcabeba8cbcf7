//! On/Off 恒定码率发生器（攻击流）
//!
//! "开"期间以恒定速率发送固定大小的 UDP 载荷，"关"期间静默。
//! 开时长不小于仿真时长、关时长为 0 时就是整个仿真期间的持续发送。

use std::any::Any;

use crate::net::{DataRate, FlowId, FlowTuple, Network, NodeId};
use crate::sim::{SimTime, Simulator};

use super::app::{AppId, Application, schedule_timer};

#[derive(Debug, Clone)]
pub struct OnOffConfig {
    pub rate: DataRate,
    /// 每个 packet 的载荷字节数
    pub packet_bytes: u32,
    pub on_time: SimTime,
    pub off_time: SimTime,
}

#[derive(Debug)]
pub struct OnOffApplication {
    flow: FlowId,
    tuple: FlowTuple,
    cfg: OnOffConfig,
    running: bool,
    /// 下一次发送所在"开"阶段的结束时刻
    on_until: SimTime,
    sent_pkts: u64,
    sent_bytes: u64,
}

impl OnOffApplication {
    /// # Panics
    ///
    /// `on_time` 为 0（永远不会进入"开"阶段）。
    pub fn new(flow: FlowId, tuple: FlowTuple, cfg: OnOffConfig) -> Self {
        assert!(cfg.on_time > SimTime::ZERO, "on/off generator needs a positive on time");
        Self {
            flow,
            tuple,
            cfg,
            running: false,
            on_until: SimTime::ZERO,
            sent_pkts: 0,
            sent_bytes: 0,
        }
    }

    pub fn flow(&self) -> FlowId {
        self.flow
    }

    pub fn sent_pkts(&self) -> u64 {
        self.sent_pkts
    }

    pub fn sent_bytes(&self) -> u64 {
        self.sent_bytes
    }

    /// 两个 packet 之间的间隔：载荷比特数 / 速率
    pub fn interval(&self) -> SimTime {
        self.cfg.rate.tx_time(self.cfg.packet_bytes).max(SimTime(1))
    }

    fn send_one(&mut self, sim: &mut Simulator, net: &mut Network) {
        let pkt = net.make_packet(self.flow, self.tuple, self.cfg.packet_bytes, sim.now());
        net.send(pkt, sim);
        self.sent_pkts += 1;
        self.sent_bytes += self.cfg.packet_bytes as u64;
    }

    /// 下一次发送的时刻。
    ///
    /// 只有"开"阶段的时间计入发送间隔：间隔跨过阶段边界时，
    /// 剩下的部分顺延到下一个"开"阶段开始之后。
    fn schedule_next(&mut self, me: AppId, sim: &mut Simulator) {
        let mut owed = self.interval();
        let mut from = sim.now();
        loop {
            let at = from.after(owed);
            if at == SimTime(u64::MAX) {
                return;
            }
            if at < self.on_until {
                schedule_timer(sim, at, me);
                return;
            }
            owed = owed.since(self.on_until.since(from));
            from = self.on_until.after(self.cfg.off_time);
            self.on_until = from.after(self.cfg.on_time);
        }
    }
}

impl Application for OnOffApplication {
    fn node(&self) -> NodeId {
        self.tuple.src
    }

    fn start(&mut self, me: AppId, sim: &mut Simulator, net: &mut Network) {
        self.running = true;
        self.on_until = sim.now().after(self.cfg.on_time);
        self.send_one(sim, net);
        self.schedule_next(me, sim);
    }

    fn on_timer(&mut self, me: AppId, sim: &mut Simulator, net: &mut Network) {
        if !self.running {
            return;
        }
        self.send_one(sim, net);
        self.schedule_next(me, sim);
    }

    fn stop(&mut self, sim: &mut Simulator, net: &mut Network) {
        self.running = false;
        if let Some(fm) = &mut net.flowmon {
            fm.on_flow_stopped(self.flow, sim.now());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
