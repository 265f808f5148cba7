//! 注册表与广播介质
//!
//! 持有全部存活节点、全局配置与全局统计。可达性测试是确定性的
//! 距离阈值，不建模碰撞与丢包。节点在交付期间被暂时取出，
//! 保证任一时刻最多一个节点的可变状态被访问。

use super::config::Context;
use super::geometry::Position;
use super::id::NodeId;
use super::node::{DEFAULT_DATA_CONTENT, Node};
use super::packet::Packet;
use super::role::Role;
use super::route::NotSupportedError;
use super::snapshot::{NodeSnapshot, NodeSpec, RouteSnapshot, StatsSnapshot};
use super::stats::WorldStats;
use super::timer::{AdvertiseTimer, DataTimer};
use crate::radio::LinkParams;
use crate::sim::{SimTime, Simulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, info, trace};

/// 注册表里的节点静态信息。位置与角色创建后不变，
/// 扇出时按名字查询，无需取出节点本体。
#[derive(Debug, Clone)]
struct NodeInfo {
    id: NodeId,
    position: Position,
    role: Role,
    range_km: f64,
}

/// 网状网络世界：节点注册表 + 全局统计
pub struct Network {
    nodes: Vec<Option<Node>>,
    directory: HashMap<String, NodeInfo>,
    ctx: Context,
    pub stats: WorldStats,
    rng: StdRng,
    /// 定时器世代：重置时递增，旧世代的定时器事件一律失效
    generation: u64,
    /// 动态加入、尚未被全网路由的节点及其加入时刻
    pending_discoveries: Vec<(String, SimTime)>,
}

impl Network {
    pub fn new(ctx: Context) -> Self {
        let rng = StdRng::seed_from_u64(ctx.seed);
        Self {
            nodes: Vec::new(),
            directory: HashMap::new(),
            ctx,
            stats: WorldStats::default(),
            rng,
            generation: 0,
            pending_discoveries: Vec::new(),
        }
    }

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    /// 替换配置并按新种子重置随机源
    pub fn set_ctx(&mut self, ctx: Context) {
        self.rng = StdRng::seed_from_u64(ctx.seed);
        self.ctx = ctx;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn link_params(&self) -> LinkParams {
        self.ctx.link_params()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn position_of(&self, name: &str) -> Option<Position> {
        self.directory.get(name).map(|info| info.position)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.directory.get(name).map(|info| info.id)
    }

    /// 区间 [0, secs) 内的均匀随机延迟，用于错开各节点的定时器
    fn jitter(&mut self, secs: f64) -> SimTime {
        if secs <= 0.0 {
            return SimTime::ZERO;
        }
        SimTime::from_secs_f64(self.rng.gen_range(0.0..secs))
    }

    /// 创建并注册一个节点，调度其定时器。位置缺省时在
    /// [0, area_km)² 内均匀随机落点。
    pub fn spawn(
        &mut self,
        role: Role,
        position: Option<Position>,
        sim: &mut Simulator,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = format!("node-{}", id.0);
        let position = position.unwrap_or_else(|| {
            Position::new(
                self.rng.gen_range(0.0..self.ctx.area_km),
                self.rng.gen_range(0.0..self.ctx.area_km),
            )
        });
        let range_km = self.ctx.connection_range_km();

        debug!(node = %name, ?position, %role, range_km, "注册节点");
        self.nodes
            .push(Some(Node::new(name.clone(), role, position, range_km)));
        self.directory.insert(
            name,
            NodeInfo {
                id,
                position,
                role,
                range_km,
            },
        );

        // 通告定时器：随机抖动的初始延迟，之后按固定周期自续
        let first = sim.now().saturating_add(self.jitter(self.ctx.routing_interval_secs));
        sim.schedule(
            first,
            AdvertiseTimer {
                node: id,
                generation: self.generation,
            },
        );
        if role == Role::Sensor {
            let first = sim.now().saturating_add(self.jitter(self.ctx.data_interval_secs));
            sim.schedule(
                first,
                DataTimer {
                    node: id,
                    generation: self.generation,
                },
            );
        }
        id
    }

    /// 动态加入一个普通节点并开始测量"被全网路由"的耗时。
    /// 注册表全局共享，新节点即刻参与所有可达性判定。
    pub fn add_node(&mut self, position: Option<Position>, sim: &mut Simulator) -> String {
        let id = self.spawn(Role::Normal, position, sim);
        let name = self.nodes[id.0]
            .as_ref()
            .expect("just spawned")
            .name()
            .to_string();
        self.pending_discoveries.push((name.clone(), sim.now()));
        self.stats.nodes_added += 1;
        info!(node = %name, "➕ 动态加入新节点");
        name
    }

    /// 单节点移除不支持：只能整体重置
    pub fn remove_node(&mut self, _name: &str) -> Result<(), NotSupportedError> {
        Err(NotSupportedError::NodeRemoval)
    }

    /// 整体重置。先令所有未决定时器失效并清空事件队列，再清空
    /// 注册表和计数器；顺序不可颠倒，不允许任何定时器回调观察到
    /// 半清空的注册表。
    pub fn reset(&mut self, sim: &mut Simulator) {
        self.generation = self.generation.wrapping_add(1);
        sim.clear();
        self.nodes.clear();
        self.directory.clear();
        self.pending_discoveries.clear();
        self.stats = WorldStats::default();
        self.rng = StdRng::seed_from_u64(self.ctx.seed);
        info!("🧹 世界已重置");
    }

    fn take(&mut self, id: NodeId) -> Node {
        self.nodes[id.0]
            .take()
            .expect("node must be registered before its timers fire")
    }

    fn put(&mut self, id: NodeId, node: Node) {
        self.nodes[id.0] = Some(node);
    }

    /// 把数据包交给某个节点处理。
    // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
    pub(crate) fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        let mut node = self.take(to);
        node.receive(pkt, self, sim);
        self.put(to, node);
    }

    /// 同步扇出：向发送方连接距离内的每个其他节点交付一份拷贝。
    /// 发送方必须已注册，否则视为调用方的顺序性错误直接终止。
    #[tracing::instrument(skip(self, pkt, sim), fields(src = %src))]
    pub fn fan_out(&mut self, src: &str, pkt: Packet, sim: &mut Simulator) {
        let sender = self
            .directory
            .get(src)
            .cloned()
            .expect("sender must be registered before broadcasting");

        trace!(now = ?sim.now(), "开始扇出");
        for idx in 0..self.nodes.len() {
            let reachable = match self.nodes[idx].as_ref() {
                Some(node) => {
                    node.name() != src
                        && sender.position.distance_km(node.position()) <= sender.range_km
                }
                None => false,
            };
            if reachable {
                self.deliver(NodeId(idx), pkt.clone(), sim);
            }
        }
    }

    /// 取出节点执行一次路由通告（定时器与带外触发共用）
    pub fn advertise(&mut self, id: NodeId, sim: &mut Simulator) {
        let mut node = self.take(id);
        node.broadcast_routing(self, sim);
        self.put(id, node);
    }

    /// 取出节点执行一次数据上报（传感器定时器使用）
    pub fn generate_data(&mut self, id: NodeId, sim: &mut Simulator) {
        let mut node = self.take(id);
        node.broadcast_data(DEFAULT_DATA_CONTENT, self, sim);
        self.put(id, node);
    }

    /// 结算"新节点被所有其他节点学到"的测量。
    /// 每个事件执行完后由世界的 on_tick 调用。
    pub(crate) fn resolve_discoveries(&mut self, now: SimTime) {
        if self.pending_discoveries.is_empty() {
            return;
        }
        let nodes = &self.nodes;
        let mut resolved: Vec<(String, SimTime)> = Vec::new();
        self.pending_discoveries.retain(|(name, added_at)| {
            let mut others = 0usize;
            let mut knowing = 0usize;
            for node in nodes.iter().flatten() {
                if node.name() == name {
                    continue;
                }
                others += 1;
                if node.routes.contains(name) {
                    knowing += 1;
                }
            }
            let done = others > 0 && knowing == others;
            if done {
                resolved.push((name.clone(), *added_at));
            }
            !done
        });
        for (name, added_at) in resolved {
            let elapsed = now.saturating_sub(added_at).as_secs_f64();
            debug!(node = %name, elapsed_secs = elapsed, "新节点已被全网路由");
            self.stats.record_discovery(elapsed);
        }
    }

    /// 每节点状态快照（路由按目的地排序，输出稳定）
    pub fn topology_snapshot(&self) -> Vec<NodeSnapshot> {
        self.nodes
            .iter()
            .flatten()
            .map(|node| {
                let mut routes: Vec<RouteSnapshot> = node
                    .routes
                    .iter()
                    .map(|(dst, e)| RouteSnapshot {
                        dst: dst.clone(),
                        via: e.via.clone(),
                        metric: e.metric,
                        rssi: e.rssi,
                        snr: e.snr,
                        role: e.role,
                    })
                    .collect();
                routes.sort_by(|a, b| a.dst.cmp(&b.dst));
                NodeSnapshot {
                    name: node.name().to_string(),
                    x: node.position().x_km,
                    y: node.position().y_km,
                    role: node.role(),
                    routes,
                    stats: node.stats.clone(),
                }
            })
            .collect()
    }

    /// 全局统计快照
    pub fn statistics_snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_messages_sent: self.stats.messages_sent,
            total_messages_received: self.stats.messages_received,
            average_time_to_deliver_secs: self.stats.avg_delivery_secs(),
            total_routes_broadcast: self.stats.routes_broadcast,
            average_new_node_discovery_secs: self.stats.avg_discovery_secs(),
            new_nodes_added: self.stats.nodes_added,
            initial_broadcast_messages_sent: self.stats.initial_broadcasts,
        }
    }

    /// 导出拓扑：只有位置与角色，不含路由与统计
    pub fn export_topology(&self) -> Vec<NodeSpec> {
        self.nodes
            .iter()
            .flatten()
            .map(|node| NodeSpec {
                x: node.position().x_km,
                y: node.position().y_km,
                role: node.role(),
            })
            .collect()
    }
}
