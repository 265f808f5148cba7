//! 随机拓扑构建

use crate::net::{MeshWorld, NodeId, Role};
use crate::sim::Simulator;

/// 构建随机拓扑
///
/// N 个节点在区域内均匀随机落点。第一个节点为传感器，最后一个
/// 为网关，其余为普通节点（只有一个节点时网关优先）。
/// 返回：按序号排列的节点标识
pub fn build_random(sim: &mut Simulator, world: &mut MeshWorld) -> Vec<NodeId> {
    let n = world.net.ctx().num_nodes;

    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let role = if i + 1 == n {
            Role::Gateway
        } else if i == 0 {
            Role::Sensor
        } else {
            Role::Normal
        };
        ids.push(world.net.spawn(role, None, sim));
    }
    ids
}
