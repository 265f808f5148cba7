//! 网状网络模块
//!
//! 此模块包含网状网络仿真的核心组件：节点、数据包、路由表、
//! 注册表（世界）与对外快照接口。

// 子模块声明
mod api;
mod config;
mod geometry;
mod id;
mod mesh_world;
mod network;
mod node;
mod packet;
mod role;
mod route;
mod snapshot;
mod stats;
mod timer;

// 重新导出公共接口
pub use api::{ConfigureParams, Layout, MeshSim};
pub use config::Context;
pub use geometry::Position;
pub use id::NodeId;
pub use mesh_world::MeshWorld;
pub use network::Network;
pub use node::{DEFAULT_DATA_CONTENT, Node};
pub use packet::{BROADCAST_ADDR, DataPacket, Packet, RouteAdvert, RoutingPacket};
pub use role::Role;
pub use route::{NotSupportedError, RouteEntry, RoutingTable};
pub use snapshot::{NodeSnapshot, NodeSpec, RouteSnapshot, StatsSnapshot};
pub use stats::{NodeStats, WorldStats};
pub use timer::{AdvertiseOnce, AdvertiseTimer, DataTimer, FanOut};
