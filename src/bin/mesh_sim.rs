//! 网状网络仿真
//!
//! 运行距离向量路由网状网络仿真，结束后输出全局统计，
//! 可选导出拓扑快照 JSON。

use clap::Parser;
use meshsim_rs::net::{ConfigureParams, Context, Layout, MeshSim};
use meshsim_rs::sim::SimTime;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mesh-sim", about = "网状网络仿真：距离向量路由 + LoRa 链路预算")]
struct Args {
    #[arg(long, default_value_t = 10)]
    nodes: usize,
    /// 部署区域边长（公里）
    #[arg(long, default_value_t = 10.0)]
    area_km: f64,
    #[arg(long, default_value_t = 7)]
    spreading_factor: u8,
    #[arg(long, default_value_t = 14.0)]
    tx_power_dbm: f64,
    #[arg(long, default_value_t = 2.7)]
    path_loss_exponent: f64,
    /// 路由通告周期（秒）
    #[arg(long, default_value_t = 2.0)]
    routing_interval_secs: f64,
    /// 传感器数据周期（秒）
    #[arg(long, default_value_t = 5.0)]
    data_interval_secs: f64,
    /// 布局：linear 或 random
    #[arg(long, default_value = "random")]
    layout: String,
    /// 路由表变化时立即追加带外通告
    #[arg(long)]
    reroute_on_new_node: bool,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// 仿真运行到多少秒
    #[arg(long, default_value_t = 60)]
    until_secs: u64,
    /// 拓扑快照输出文件（JSON）
    #[arg(long)]
    snapshot_json: Option<PathBuf>,
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let layout = match args.layout.as_str() {
        "linear" => Layout::Linear,
        "random" => Layout::Random,
        other => {
            eprintln!("unknown layout: {other} (expected linear|random)");
            std::process::exit(2);
        }
    };

    let params = ConfigureParams {
        num_nodes: args.nodes,
        area_km: args.area_km,
        spreading_factor: args.spreading_factor,
        tx_power_dbm: args.tx_power_dbm,
        path_loss_exponent: args.path_loss_exponent,
        routing_interval_secs: args.routing_interval_secs,
        data_interval_secs: args.data_interval_secs,
        reroute_on_new_node: args.reroute_on_new_node,
        layout,
        seed: Some(args.seed),
    };

    let mut mesh = MeshSim::new(Context::default());
    let range_km = match mesh.configure(&params) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    println!("connection_range_km={range_km:.3}");

    mesh.run_until(SimTime::from_secs(args.until_secs));

    let stats = mesh.statistics_snapshot();
    println!(
        "done @ {:?}, sent={}, received={}, avg_latency_s={:.6}, routes_broadcast={}, initial_broadcasts={}",
        mesh.sim.now(),
        stats.total_messages_sent,
        stats.total_messages_received,
        stats.average_time_to_deliver_secs,
        stats.total_routes_broadcast,
        stats.initial_broadcast_messages_sent,
    );

    if let Some(path) = args.snapshot_json {
        let snapshot = mesh.topology_snapshot();
        let json = serde_json::to_string_pretty(&snapshot).expect("serialize snapshot");
        if let Err(e) = fs::write(&path, json) {
            eprintln!("failed to write {}: {e}", path.display());
            std::process::exit(1);
        }
        println!("snapshot written to {}", path.display());
    }
}
