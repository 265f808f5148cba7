//! 对外快照类型
//!
//! 供展示/推送层消费的只读视图，以及拓扑导入导出的最小描述。

use super::role::Role;
use super::stats::NodeStats;
use serde::{Deserialize, Serialize};

/// 拓扑导入/导出条目：只有位置与角色，不含路由与统计
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeSpec {
    pub x: f64,
    pub y: f64,
    pub role: Role,
}

/// 快照中的单条路由
#[derive(Debug, Clone, Serialize)]
pub struct RouteSnapshot {
    pub dst: String,
    pub via: String,
    pub metric: u32,
    pub rssi: f64,
    pub snr: f64,
    pub role: Role,
}

/// 单节点状态快照
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub role: Role,
    pub routes: Vec<RouteSnapshot>,
    pub stats: NodeStats,
}

/// 全局统计快照
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSnapshot {
    pub total_messages_sent: u64,
    pub total_messages_received: u64,
    pub average_time_to_deliver_secs: f64,
    pub total_routes_broadcast: u64,
    pub average_new_node_discovery_secs: f64,
    pub new_nodes_added: u64,
    pub initial_broadcast_messages_sent: u64,
}
