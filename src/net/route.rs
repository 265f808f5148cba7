//! 路由表
//!
//! 每节点一张：目的地 -> 当前最优路由。更新策略：跳数严格更小者
//! 总是胜出；跳数相同仅在 SNR 严格更优时替换（相同 SNR 保持在位
//! 路由不变，比较器不可改动，改了会改变收敛结果）。

use super::packet::RouteAdvert;
use super::role::Role;
use crate::radio::LinkParams;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

/// 显式的"未实现"错误，区别于静默 no-op
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotSupportedError {
    #[error("route removal is not implemented")]
    RouteRemoval,
    #[error("node removal is not implemented")]
    NodeRemoval,
}

/// 单条路由：目的地对应的下一跳与链路质量
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub via: String,
    /// 跳数，>= 1
    pub metric: u32,
    pub rssi: f64,
    pub snr: f64,
    /// 目的地节点的角色
    pub role: Role,
}

/// 路由表，由所属节点独占持有
#[derive(Debug, Clone)]
pub struct RoutingTable {
    owner: String,
    routes: HashMap<String, RouteEntry>,
}

impl RoutingTable {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            routes: HashMap::new(),
        }
    }

    /// 尝试学习一条路由，返回表是否发生变化。
    ///
    /// 链路质量由到直接邻居的距离经链路模型算出。到自身的路由
    /// 永远拒绝（节点不持有 dst == 自己 的表项）。
    pub fn add_route(
        &mut self,
        dst: &str,
        via: &str,
        metric: u32,
        distance_km: f64,
        role: Role,
        link: &LinkParams,
    ) -> bool {
        if dst == self.owner {
            return false;
        }

        let (rssi, snr) = link.link_quality(distance_km);

        if let Some(cur) = self.routes.get(dst) {
            // 在位路由跳数更少，或跳数持平且新 SNR 不严格更优：保持不变
            if cur.metric < metric || (cur.metric == metric && snr <= cur.snr) {
                return false;
            }
        }

        trace!(owner = %self.owner, dst, via, metric, snr, "路由表更新");
        self.routes.insert(
            dst.to_string(),
            RouteEntry {
                via: via.to_string(),
                metric,
                rssi,
                snr,
                role,
            },
        );
        true
    }

    /// 路由删除不支持：节点只增不减，整表随世界重置一起销毁。
    pub fn remove_route(&mut self, _dst: &str) -> Result<(), NotSupportedError> {
        Err(NotSupportedError::RouteRemoval)
    }

    pub fn get(&self, dst: &str) -> Option<&RouteEntry> {
        self.routes.get(dst)
    }

    pub fn contains(&self, dst: &str) -> bool {
        self.routes.contains_key(dst)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RouteEntry)> {
        self.routes.iter()
    }

    /// 已知路由中的最优网关：按 (跳数升序, SNR 降序) 排序取第一个。
    /// 名字做末位决胜，保证结果与哈希表遍历顺序无关。
    pub fn best_gateway(&self) -> Option<(&str, &RouteEntry)> {
        let mut gateways: Vec<(&String, &RouteEntry)> = self
            .routes
            .iter()
            .filter(|(_, e)| e.role == Role::Gateway)
            .collect();
        gateways.sort_by(|a, b| {
            a.1.metric
                .cmp(&b.1.metric)
                .then(b.1.snr.total_cmp(&a.1.snr))
                .then(a.0.cmp(b.0))
        });
        gateways.first().map(|&(name, entry)| (name.as_str(), entry))
    }

    /// 序列化为路由通告视图（目的地 -> {metric, role}）
    pub fn advertised(&self) -> HashMap<String, RouteAdvert> {
        self.routes
            .iter()
            .map(|(dst, e)| {
                (
                    dst.clone(),
                    RouteAdvert {
                        metric: e.metric,
                        role: e.role,
                    },
                )
            })
            .collect()
    }
}
