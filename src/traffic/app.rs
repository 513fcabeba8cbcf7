//! 应用层
//!
//! 安装在节点上的流量发生器与接收端。应用在两次发送之间"暂停"，
//! 这只是下一次定时事件尚未到期，没有任何真实的阻塞。

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::net::{NetWorld, Network, NodeId, Packet};
use crate::sim::{Event, SimTime, Simulator, World};
use tracing::trace;

/// 应用标识符（安装顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId(pub usize);

/// 应用接口
pub trait Application: Send + fmt::Debug {
    /// 安装所在的节点
    fn node(&self) -> NodeId;

    fn start(&mut self, me: AppId, sim: &mut Simulator, net: &mut Network);

    /// 应用自己调度的定时器到期
    fn on_timer(&mut self, _me: AppId, _sim: &mut Simulator, _net: &mut Network) {}

    fn stop(&mut self, sim: &mut Simulator, net: &mut Network);

    /// 目的地为本节点的 packet 到达
    fn on_receive(&mut self, _pkt: &Packet, _now: SimTime) {}

    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEventKind {
    Start,
    Timer,
    Stop,
}

/// 事件：驱动某个应用的启动、定时器或停止。
#[derive(Debug)]
pub struct AppEvent {
    pub app: AppId,
    pub kind: AppEventKind,
}

impl Event for AppEvent {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        let NetWorld { net, apps } = w;
        apps.dispatch(self.app, self.kind, sim, net);
    }
}

/// 所有已安装的应用
#[derive(Debug, Default)]
pub struct AppStack {
    apps: Vec<Box<dyn Application>>,
    by_node: HashMap<NodeId, Vec<AppId>>,
}

impl AppStack {
    /// 安装应用并按绝对时刻调度启动与停止
    pub fn install(
        &mut self,
        app: Box<dyn Application>,
        start: SimTime,
        stop: SimTime,
        sim: &mut Simulator,
    ) -> AppId {
        let id = AppId(self.apps.len());
        self.by_node.entry(app.node()).or_default().push(id);
        self.apps.push(app);
        sim.schedule(
            start,
            AppEvent {
                app: id,
                kind: AppEventKind::Start,
            },
        );
        sim.schedule(
            stop,
            AppEvent {
                app: id,
                kind: AppEventKind::Stop,
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// 按具体类型取出应用
    pub fn get<T: Application + 'static>(&self, id: AppId) -> Option<&T> {
        self.apps.get(id.0)?.as_any().downcast_ref::<T>()
    }

    pub(crate) fn dispatch(
        &mut self,
        id: AppId,
        kind: AppEventKind,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(app) = self.apps.get_mut(id.0) else {
            return;
        };
        trace!(app = id.0, ?kind, now = %sim.now(), "应用事件");
        match kind {
            AppEventKind::Start => app.start(id, sim, net),
            AppEventKind::Timer => app.on_timer(id, sim, net),
            AppEventKind::Stop => app.stop(sim, net),
        }
    }

    /// 把到达目的地的 packet 交给目的节点上的应用
    pub fn on_receive(&mut self, pkt: &Packet, now: SimTime) {
        let Some(ids) = self.by_node.get(&pkt.dst()) else {
            return;
        };
        for id in ids {
            self.apps[id.0].on_receive(pkt, now);
        }
    }
}

/// 在 `at` 时刻触发应用 `app` 的定时器
pub(crate) fn schedule_timer(sim: &mut Simulator, at: SimTime, app: AppId) {
    sim.schedule(
        at,
        AppEvent {
            app,
            kind: AppEventKind::Timer,
        },
    );
}
