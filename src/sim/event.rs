//! 事件与世界
//!
//! 仿真器只认识这两个 trait：事件负责改变世界，世界由业务层（网络、应用、测量）实现。

use super::simulator::Simulator;
use std::any::Any;

/// 事件：在调度时刻被执行一次。使用 `self: Box<Self>` 以便事件把自身携带的数据 move 出来。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}

/// 仿真世界。事件通过 `as_any_mut` 向下转型拿到具体类型。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每执行完一个事件调用一次
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
