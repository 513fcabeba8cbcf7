//! 流量编排
//!
//! 为每个 bot 安装一个指向受害者的 On/Off 攻击流，为指定源安装一个有字节预算的
//! 批量发送流，并在受害者上安装一个接收端。所有应用都在 0 时刻启动、在仿真截止
//! 时刻停止（批量发送可能因预算用完而提前自然结束）。调度用的都是绝对时刻，
//! 安装顺序只影响流标识的编号顺序：先是攻击流（按 bot 序号），最后是合法流。

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScenarioError};
use crate::net::{DataRate, FlowId, NetWorld, Network, NodeId, TransportKind};
use crate::sim::{SimTime, Simulator};
use crate::topo::two_tier::{BOT, default_legit_source, default_victim};
use crate::topo::{NodeRef, Topology};

use super::app::AppId;
use super::bulk_send::BulkSendApplication;
use super::flow::{FlowBudget, FlowClass, TrafficFlow};
use super::onoff::{OnOffApplication, OnOffConfig};
use super::sink::PacketSink;

/// 攻击流配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackSpec {
    /// 发起攻击的层级：该层每个节点一个攻击流
    pub tier: String,
    pub rate: DataRate,
    pub packet_bytes: u32,
    pub port: u16,
    pub on_time_ms: u64,
    pub off_time_ms: u64,
}

impl Default for AttackSpec {
    fn default() -> Self {
        Self {
            tier: BOT.into(),
            rate: DataRate::from_mbps(1),
            packet_bytes: 512,
            port: 9001,
            on_time_ms: 30_000,
            off_time_ms: 0,
        }
    }
}

/// 合法批量流配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegitSpec {
    pub source: NodeRef,
    pub max_bytes: u64,
    pub send_bytes: u32,
    pub port: u16,
}

impl Default for LegitSpec {
    fn default() -> Self {
        Self {
            source: default_legit_source(),
            max_bytes: 100_000,
            send_bytes: 512,
            port: 9000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficSpec {
    pub victim: NodeRef,
    pub attack: AttackSpec,
    pub legit: LegitSpec,
}

impl Default for TrafficSpec {
    fn default() -> Self {
        Self {
            victim: default_victim(),
            attack: AttackSpec::default(),
            legit: LegitSpec::default(),
        }
    }
}

impl TrafficSpec {
    pub fn validate(&self) -> Result<()> {
        if self.attack.rate.bps() == 0 {
            return Err(ScenarioError::NonPositive("attack.rate"));
        }
        if self.attack.packet_bytes == 0 {
            return Err(ScenarioError::NonPositive("attack.packet_bytes"));
        }
        if self.attack.on_time_ms == 0 {
            return Err(ScenarioError::NonPositive("attack.on_time_ms"));
        }
        if self.legit.send_bytes == 0 {
            return Err(ScenarioError::NonPositive("legit.send_bytes"));
        }
        Ok(())
    }
}

/// 编排结果
#[derive(Debug, Clone)]
pub struct TrafficPlan {
    /// 按流标识排序
    pub flows: Vec<TrafficFlow>,
    pub victim: NodeId,
    pub victim_addr: Ipv4Addr,
    pub sink: AppId,
    pub bulk: AppId,
}

impl TrafficPlan {
    pub fn attack_flows(&self) -> impl Iterator<Item = &TrafficFlow> {
        self.flows.iter().filter(|f| f.class == FlowClass::Attack)
    }

    pub fn legit_flow(&self) -> Option<&TrafficFlow> {
        self.flows.iter().find(|f| f.class == FlowClass::Legitimate)
    }
}

pub struct TrafficOrchestrator<'a> {
    spec: &'a TrafficSpec,
    horizon: SimTime,
}

impl<'a> TrafficOrchestrator<'a> {
    pub fn new(spec: &'a TrafficSpec, horizon: SimTime) -> Self {
        Self { spec, horizon }
    }

    fn resolve(topo: &Topology, r: &NodeRef, role: &'static str) -> Result<NodeId> {
        let invalid = |reason| ScenarioError::InvalidEndpoint {
            role,
            tier: r.tier.clone(),
            index: r.index,
            reason,
        };
        let tier = topo.tier(&r.tier).ok_or_else(|| invalid("unknown tier"))?;
        tier.nodes
            .get(r.index)
            .copied()
            .ok_or_else(|| invalid("index out of range"))
    }

    /// 节点的主地址。
    ///
    /// # Panics
    ///
    /// 节点还没有被分配地址（编址必须先于编排）。
    fn address_of(net: &Network, node: NodeId) -> Ipv4Addr {
        net.primary_address(node).unwrap_or_else(|| {
            panic!("cannot schedule traffic on {node}: no address assigned yet")
        })
    }

    fn check_reachable(net: &mut Network, src: NodeId, dst: NodeId, flow: FlowId) -> Result<()> {
        if net.next_hop(src, dst, flow).is_none() {
            let name = |n: NodeId| net.node(n).map(|x| x.name().to_string()).unwrap_or_default();
            return Err(ScenarioError::Unreachable {
                from: name(src),
                to: name(dst),
            });
        }
        Ok(())
    }

    /// 在 `world` 上安装全部流与接收端，并在 `sim` 中调度它们的启动与停止
    pub fn install(
        &self,
        topo: &Topology,
        world: &mut NetWorld,
        sim: &mut Simulator,
    ) -> Result<TrafficPlan> {
        self.spec.validate()?;
        let spec = self.spec;

        let victim = Self::resolve(topo, &spec.victim, "victim")?;
        let source = Self::resolve(topo, &spec.legit.source, "legitimate source")?;
        let bots = topo
            .tier(&spec.attack.tier)
            .ok_or_else(|| ScenarioError::InvalidEndpoint {
                role: "attack",
                tier: spec.attack.tier.clone(),
                index: 0,
                reason: "unknown tier",
            })?
            .nodes
            .clone();
        for &n in bots.iter().chain([&source]) {
            if n == victim {
                return Err(ScenarioError::SourceIsVictim(spec.victim.to_string()));
            }
        }

        let net = &mut world.net;
        let victim_addr = Self::address_of(net, victim);
        let start = SimTime::ZERO;
        let stop = self.horizon;

        let mut flows = Vec::with_capacity(bots.len() + 1);
        for &bot in &bots {
            let id = FlowId(flows.len() as u64);
            flows.push(TrafficFlow {
                id,
                class: FlowClass::Attack,
                src: bot,
                dst: victim,
                src_addr: Self::address_of(net, bot),
                dst_addr: victim_addr,
                dst_port: spec.attack.port,
                transport: TransportKind::Udp,
                budget: FlowBudget::Rate(spec.attack.rate),
                start,
                stop,
            });
        }
        let legit_id = FlowId(flows.len() as u64);
        flows.push(TrafficFlow {
            id: legit_id,
            class: FlowClass::Legitimate,
            src: source,
            dst: victim,
            src_addr: Self::address_of(net, source),
            dst_addr: victim_addr,
            dst_port: spec.legit.port,
            transport: TransportKind::Tcp,
            budget: FlowBudget::Bytes(spec.legit.max_bytes),
            start,
            stop,
        });

        for f in &flows {
            Self::check_reachable(net, f.src, f.dst, f.id)?;
        }

        // 配置检查全部通过之后才开始安装
        if let Some(fm) = &mut net.flowmon {
            for f in &flows {
                fm.register(f);
            }
        }

        let onoff = OnOffConfig {
            rate: spec.attack.rate,
            packet_bytes: spec.attack.packet_bytes,
            on_time: SimTime::from_millis(spec.attack.on_time_ms),
            off_time: SimTime::from_millis(spec.attack.off_time_ms),
        };
        let mut bulk = None;
        for f in &flows {
            let app: Box<dyn super::app::Application> = match f.class {
                FlowClass::Attack => Box::new(OnOffApplication::new(f.id, f.tuple(), onoff.clone())),
                FlowClass::Legitimate => Box::new(BulkSendApplication::new(
                    f.id,
                    f.tuple(),
                    spec.legit.send_bytes,
                    spec.legit.max_bytes,
                )),
            };
            let app_id = world.apps.install(app, f.start, f.stop, sim);
            if f.class == FlowClass::Legitimate {
                bulk = Some(app_id);
            }
            debug!(flow = f.id.0, class = ?f.class, src = %f.src_addr, dst = %f.dst_addr, port = f.dst_port, "安装流");
        }

        let sink = world.apps.install(
            Box::new(PacketSink::new(victim, TransportKind::Tcp, spec.legit.port)),
            start,
            stop,
            sim,
        );

        info!(
            attack_flows = bots.len(),
            victim = %victim_addr,
            rate = %spec.attack.rate,
            legit_budget = spec.legit.max_bytes,
            horizon = %self.horizon,
            "流量编排完成"
        );

        Ok(TrafficPlan {
            flows,
            victim,
            victim_addr,
            sink,
            bulk: bulk.expect("legitimate flow is always installed"),
        })
    }
}
