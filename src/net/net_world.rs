//! 网络世界实现
//!
//! 仿真世界：持有网络拓扑与安装在节点上的应用。

use super::network::Network;
use crate::sim::World;
use crate::traffic::AppStack;
use std::any::Any;

#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
    pub apps: AppStack,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
