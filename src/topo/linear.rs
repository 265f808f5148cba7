//! 直线拓扑构建

use crate::net::{MeshWorld, NodeId, Position, Role};
use crate::sim::Simulator;

/// 构建直线拓扑
///
/// N 个节点沿水平线排布，间距为连接距离的 0.99 倍，保证相邻
/// 节点恰好互相可达。最后一个节点为网关，其余为普通节点。
/// 返回：按序号排列的节点标识
pub fn build_linear(sim: &mut Simulator, world: &mut MeshWorld) -> Vec<NodeId> {
    let ctx = world.net.ctx();
    let n = ctx.num_nodes;
    let spacing_km = ctx.connection_range_km() * 0.99;
    let y_km = ctx.area_km / 2.0;

    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let role = if i + 1 == n { Role::Gateway } else { Role::Normal };
        let position = Position::new(i as f64 * spacing_km, y_km);
        ids.push(world.net.spawn(role, Some(position), sim));
    }
    ids
}
