//! 网状网络世界实现
//!
//! 仿真世界（World）实现，持有网络注册表。

use super::config::Context;
use super::network::Network;
use crate::sim::{Simulator, World};
use std::any::Any;

/// 默认的网状网络世界实现：持有 Network。
pub struct MeshWorld {
    pub net: Network,
}

impl MeshWorld {
    pub fn new(ctx: Context) -> Self {
        Self {
            net: Network::new(ctx),
        }
    }
}

impl World for MeshWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    /// 每个事件之后结算一次新节点发现测量
    fn on_tick(&mut self, sim: &mut Simulator) {
        let now = sim.now();
        self.net.resolve_discoveries(now);
    }
}
