//! 节点定时器事件
//!
//! 每节点每种定时器对应一类队列条目，由唯一的调度循环驱动。
//! 取消是协作式的：事件携带调度时的世代号，世界重置后世代不再
//! 匹配，旧事件自行失效，不会续期。

use super::id::NodeId;
use super::mesh_world::MeshWorld;
use super::packet::Packet;
use crate::sim::{Event, Simulator, World};
use tracing::trace;

/// 事件：周期路由通告，执行后自续
#[derive(Debug)]
pub struct AdvertiseTimer {
    pub node: NodeId,
    pub generation: u64,
}

impl Event for AdvertiseTimer {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AdvertiseTimer { node, generation } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<MeshWorld>()
            .expect("world must be MeshWorld");
        if generation != w.net.generation() {
            trace!(?node, generation, "过期通告定时器，忽略");
            return;
        }
        w.net.advertise(node, sim);
        let next = sim.now().saturating_add(w.net.ctx().routing_interval());
        sim.schedule(next, AdvertiseTimer { node, generation });
    }
}

/// 事件：传感器周期数据上报，执行后自续
#[derive(Debug)]
pub struct DataTimer {
    pub node: NodeId,
    pub generation: u64,
}

impl Event for DataTimer {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DataTimer { node, generation } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<MeshWorld>()
            .expect("world must be MeshWorld");
        if generation != w.net.generation() {
            trace!(?node, generation, "过期数据定时器，忽略");
            return;
        }
        w.net.generate_data(node, sim);
        let next = sim.now().saturating_add(w.net.ctx().data_interval());
        sim.schedule(next, DataTimer { node, generation });
    }
}

/// 事件：带外的一次性路由通告（路由表变化触发），不自续
#[derive(Debug)]
pub struct AdvertiseOnce {
    pub node: NodeId,
    pub generation: u64,
}

impl Event for AdvertiseOnce {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AdvertiseOnce { node, generation } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<MeshWorld>()
            .expect("world must be MeshWorld");
        if generation != w.net.generation() {
            return;
        }
        w.net.advertise(node, sim);
    }
}

/// 事件：以 src 为发送方扇出一个数据包（转发的第二跳及之后使用，
/// 与触发它的交付在同一仿真时刻执行）
#[derive(Debug)]
pub struct FanOut {
    pub src: String,
    pub pkt: Packet,
}

impl Event for FanOut {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let FanOut { src, pkt } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<MeshWorld>()
            .expect("world must be MeshWorld");
        w.net.fan_out(&src, pkt, sim);
    }
}
