//! 对外操作接口
//!
//! 展示/推送层可调用的全部变更与查询操作。配置变更凡是涉及
//! 发射功率、扩频因子或路径损耗指数的，都会在建网前重新推导并
//! 返回连接距离。

use super::config::Context;
use super::geometry::Position;
use super::mesh_world::MeshWorld;
use super::snapshot::{NodeSnapshot, NodeSpec, StatsSnapshot};
use crate::radio::ConfigError;
use crate::sim::{SimTime, Simulator};
use crate::topo;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 建网布局策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// 直线排布，间距为连接距离的 0.99 倍
    Linear,
    /// 区域内均匀随机落点
    Random,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Random
    }
}

/// 一次配置变更的参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureParams {
    pub num_nodes: usize,
    pub area_km: f64,
    pub spreading_factor: u8,
    pub tx_power_dbm: f64,
    pub path_loss_exponent: f64,
    pub routing_interval_secs: f64,
    pub data_interval_secs: f64,
    pub reroute_on_new_node: bool,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// 仿真器 + 世界的组合门面
pub struct MeshSim {
    pub sim: Simulator,
    pub world: MeshWorld,
}

impl MeshSim {
    pub fn new(ctx: Context) -> Self {
        Self {
            sim: Simulator::default(),
            world: MeshWorld::new(ctx),
        }
    }

    /// 应用新配置并整体重建，返回新推导的连接距离（公里）。
    /// 推导失败（扩频因子非法）时现有仿真保持原样。
    pub fn configure(&mut self, params: &ConfigureParams) -> Result<f64, ConfigError> {
        let mut ctx = self.world.net.ctx().clone();
        ctx.num_nodes = params.num_nodes;
        ctx.area_km = params.area_km;
        ctx.spreading_factor = params.spreading_factor;
        ctx.tx_power_dbm = params.tx_power_dbm;
        ctx.path_loss_exponent = params.path_loss_exponent;
        ctx.routing_interval_secs = params.routing_interval_secs;
        ctx.data_interval_secs = params.data_interval_secs;
        ctx.reroute_on_new_node = params.reroute_on_new_node;
        if let Some(seed) = params.seed {
            ctx.seed = seed;
        }
        let ctx = ctx.derive_range()?;
        let range_km = ctx.connection_range_km();
        info!(range_km, ?params.layout, "⚙️  应用新配置并重建仿真");

        self.world.net.reset(&mut self.sim);
        self.world.net.set_ctx(ctx);
        match params.layout {
            Layout::Linear => {
                topo::build_linear(&mut self.sim, &mut self.world);
            }
            Layout::Random => {
                topo::build_random(&mut self.sim, &mut self.world);
            }
        }
        Ok(range_km)
    }

    /// 在指定位置动态加入一个普通节点，返回其名字
    pub fn add_node(&mut self, position: Position) -> String {
        self.world.net.add_node(Some(position), &mut self.sim)
    }

    /// 由显式节点列表重建拓扑
    pub fn load_topology(&mut self, specs: &[NodeSpec]) {
        self.world.net.reset(&mut self.sim);
        topo::build_explicit(&mut self.sim, &mut self.world, specs);
    }

    /// 导出拓扑（仅位置与角色）
    pub fn export_topology(&self) -> Vec<NodeSpec> {
        self.world.net.export_topology()
    }

    /// 清空世界与所有计数器
    pub fn reset(&mut self) {
        self.world.net.reset(&mut self.sim);
    }

    pub fn topology_snapshot(&self) -> Vec<NodeSnapshot> {
        self.world.net.topology_snapshot()
    }

    pub fn statistics_snapshot(&self) -> StatsSnapshot {
        self.world.net.statistics_snapshot()
    }

    /// 推进仿真到指定时刻
    pub fn run_until(&mut self, until: SimTime) {
        self.sim.run_until(until, &mut self.world);
    }

    /// 从当前时刻推进一段时长
    pub fn run_for(&mut self, duration: SimTime) {
        let until = self.sim.now().saturating_add(duration);
        self.run_until(until);
    }
}
