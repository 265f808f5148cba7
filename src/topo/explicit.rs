//! 显式列表拓扑构建

use crate::net::{MeshWorld, NodeId, NodeSpec, Position};
use crate::sim::Simulator;

/// 由显式节点列表建网：每个条目给定位置与角色，节点按序号命名，
/// 完全绕过布局逻辑。
/// 返回：按序号排列的节点标识
pub fn build_explicit(
    sim: &mut Simulator,
    world: &mut MeshWorld,
    specs: &[NodeSpec],
) -> Vec<NodeId> {
    specs
        .iter()
        .map(|spec| {
            world
                .net
                .spawn(spec.role, Some(Position::new(spec.x, spec.y)), sim)
        })
        .collect()
}
