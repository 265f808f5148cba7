//! 节点
//!
//! 网状网络的基本行为单元：持有位置、角色、路由表与计数器。
//! 周期性通告由定时器事件驱动；入站数据包在注册表的独占访问
//! 约束下串行处理（同一时刻最多一个节点被取出变更）。

use super::geometry::Position;
use super::network::Network;
use super::packet::{BROADCAST_ADDR, DataPacket, Packet, RoutingPacket};
use super::role::Role;
use super::route::RoutingTable;
use super::stats::NodeStats;
use super::timer::{AdvertiseOnce, FanOut};
use crate::sim::Simulator;
use tracing::{debug, trace};

/// 传感器周期上报的默认内容
pub const DEFAULT_DATA_CONTENT: &str = "Hello from Node";

/// 网状网络节点
#[derive(Debug)]
pub struct Node {
    name: String,
    /// 创建后不再变化
    position: Position,
    role: Role,
    connection_range_km: f64,
    pub routes: RoutingTable,
    pub stats: NodeStats,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        position: Position,
        connection_range_km: f64,
    ) -> Self {
        let name = name.into();
        let routes = RoutingTable::new(name.clone());
        Self {
            name,
            position,
            role,
            connection_range_km,
            routes,
            stats: NodeStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn connection_range_km(&self) -> f64 {
        self.connection_range_km
    }

    /// 能否向对端发送：非自身，且距离不超过本端（发送方）的连接距离。
    /// 只看发送方距离，不要求对称。
    pub fn can_send(&self, other: &Node) -> bool {
        self.name != other.name
            && self.position.distance_km(&other.position) <= self.connection_range_km
    }

    /// 处理到达的数据包：按包类型穷尽分发
    pub fn receive(&mut self, pkt: Packet, net: &mut Network, sim: &mut Simulator) {
        match pkt {
            Packet::Routing(p) => self.process_route(p, net, sim),
            Packet::Data(p) => self.process_data(p, net, sim),
        }
    }

    /// 处理路由通告：学习到直接邻居的 1 跳路由，以及其通告的
    /// 每个目的地的 metric+1 路由。链路质量统一用到通告发送方
    /// （直接邻居）的距离计算，不是到传递目的地的距离。
    fn process_route(&mut self, pkt: RoutingPacket, net: &mut Network, sim: &mut Simulator) {
        self.stats.routing_received += 1;

        // 发送方位置未知时按 0 距离处理
        let dist_km = net
            .position_of(&pkt.src)
            .map(|p| self.position.distance_km(&p))
            .unwrap_or(0.0);
        let link = net.link_params();

        let mut updated = self
            .routes
            .add_route(&pkt.src, &pkt.src, 1, dist_km, pkt.role, &link);
        for (dst, advert) in &pkt.routes {
            updated |= self.routes.add_route(
                dst,
                &pkt.src,
                advert.metric + 1,
                dist_km,
                advert.role,
                &link,
            );
        }

        if updated && net.ctx().reroute_on_new_node {
            // 表有变化：立即追加一次带外通告，周期计划不受影响
            if let Some(id) = net.id_of(&self.name) {
                trace!(node = %self.name, "路由变化，追加带外通告");
                sim.schedule(
                    sim.now(),
                    AdvertiseOnce {
                        node: id,
                        generation: net.generation(),
                    },
                );
            }
        }
    }

    /// 处理数据包：目的地收下，被指定为下一跳的转发，其余丢弃
    fn process_data(&mut self, pkt: DataPacket, net: &mut Network, sim: &mut Simulator) {
        if pkt.dst != self.name && pkt.via != self.name {
            trace!(node = %self.name, dst = %pkt.dst, via = %pkt.via, "既非目的地也非下一跳，丢弃");
            self.stats.data_dropped += 1;
            return;
        }

        if pkt.dst != self.name {
            // 本节点是指定下一跳：向目的地方向转发
            match self.routes.get(&pkt.dst) {
                Some(entry) => {
                    debug!(node = %self.name, dst = %pkt.dst, via = %entry.via, "转发数据包");
                    self.stats.data_forwarded += 1;
                    net.stats.messages_sent += 1;
                    let fwd = DataPacket {
                        via: entry.via.clone(),
                        ..pkt
                    };
                    sim.schedule(
                        sim.now(),
                        FanOut {
                            src: self.name.clone(),
                            pkt: Packet::Data(fwd),
                        },
                    );
                }
                None => {
                    // 无路由可用：显式丢弃，不上抛错误
                    debug!(node = %self.name, dst = %pkt.dst, "无路由，丢弃待转发数据包");
                    self.stats.data_dropped += 1;
                }
            }
            return;
        }

        // 本节点是目的地
        debug!(node = %self.name, src = %pkt.src, "📥 数据包到达目的地");
        self.stats.data_received += 1;
        net.stats.messages_received += 1;
        let latency = sim.now().saturating_sub(pkt.origin).as_secs_f64();
        net.stats.record_delivery(latency);
    }

    /// 周期通告：把路由表序列化成通告包并向所有可达节点扇出
    pub fn broadcast_routing(&mut self, net: &mut Network, sim: &mut Simulator) {
        let pkt = RoutingPacket {
            src: self.name.clone(),
            role: self.role,
            routes: self.routes.advertised(),
        };
        self.stats.routing_sent += 1;
        net.stats.routes_broadcast += 1;
        trace!(node = %self.name, entries = pkt.routes.len(), "广播路由通告");
        net.fan_out(&self.name, Packet::Routing(pkt), sim);
    }

    /// 传感器数据上报：挑选最优网关（跳数优先，SNR 次之）。
    /// 没有已知网关时退化为无目的地的泛洪，单独计数。
    pub fn broadcast_data(&mut self, content: &str, net: &mut Network, sim: &mut Simulator) {
        self.stats.data_sent += 1;

        let target = self
            .routes
            .best_gateway()
            .map(|(gw, entry)| (gw.to_string(), entry.via.clone()));

        match target {
            Some((gateway, via)) => {
                debug!(node = %self.name, gateway = %gateway, via = %via, "发送数据到最优网关");
                net.stats.messages_sent += 1;
                let pkt = DataPacket {
                    src: self.name.clone(),
                    dst: gateway,
                    via,
                    content: content.to_string(),
                    origin: sim.now(),
                };
                net.fan_out(&self.name, Packet::Data(pkt), sim);
            }
            None => {
                debug!(node = %self.name, "尚无网关路由，泛洪发送");
                net.stats.initial_broadcasts += 1;
                let pkt = DataPacket {
                    src: self.name.clone(),
                    dst: BROADCAST_ADDR.to_string(),
                    via: BROADCAST_ADDR.to_string(),
                    content: content.to_string(),
                    origin: sim.now(),
                };
                net.fan_out(&self.name, Packet::Data(pkt), sim);
            }
        }
    }
}
