//! 统计信息
//!
//! 单节点计数器与全局（世界级）统计。

use serde::Serialize;

/// 单节点统计信息
#[derive(Debug, Default, Clone, Serialize)]
pub struct NodeStats {
    pub routing_sent: u64,
    pub routing_received: u64,
    pub data_sent: u64,
    pub data_received: u64,
    pub data_forwarded: u64,
    pub data_dropped: u64,
}

/// 全局统计信息，与注册表一起原子重置
#[derive(Debug, Default, Clone)]
pub struct WorldStats {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub routes_broadcast: u64,
    pub nodes_added: u64,
    /// 无已知网关时的泛洪发送次数
    pub initial_broadcasts: u64,
    avg_delivery_secs: f64,
    delivery_samples: u64,
    avg_discovery_secs: f64,
    discovery_samples: u64,
}

impl WorldStats {
    /// 累计一次端到端交付时延（滚动平均）
    pub fn record_delivery(&mut self, latency_secs: f64) {
        self.delivery_samples += 1;
        self.avg_delivery_secs +=
            (latency_secs - self.avg_delivery_secs) / self.delivery_samples as f64;
    }

    /// 累计一次"新节点被所有节点学到"的耗时（滚动平均）
    pub fn record_discovery(&mut self, elapsed_secs: f64) {
        self.discovery_samples += 1;
        self.avg_discovery_secs +=
            (elapsed_secs - self.avg_discovery_secs) / self.discovery_samples as f64;
    }

    pub fn avg_delivery_secs(&self) -> f64 {
        self.avg_delivery_secs
    }

    pub fn avg_discovery_secs(&self) -> f64 {
        self.avg_discovery_secs
    }
}
