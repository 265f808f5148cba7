//! 仿真全局配置
//!
//! 一次运行一份；连接距离由链路预算推导，凡是改动发射功率、
//! 扩频因子或路径损耗指数的配置变更都必须在建网前重新推导。

use crate::radio::{self, ConfigError, LinkParams};
use crate::sim::SimTime;

/// 仿真上下文：节点规模、信道参数与定时器周期
#[derive(Debug, Clone)]
pub struct Context {
    pub num_nodes: usize,
    /// 部署区域边长（公里）
    pub area_km: f64,
    pub tx_power_dbm: f64,
    pub spreading_factor: u8,
    pub freq_mhz: f64,
    pub bandwidth_hz: f64,
    pub noise_figure_db: f64,
    pub path_loss_exponent: f64,
    /// 参考距离 d0（米）
    pub d0_m: f64,
    pub fade_margin_db: f64,
    pub antenna_gains_db: f64,
    pub misc_losses_db: f64,
    pub routing_interval_secs: f64,
    pub data_interval_secs: f64,
    /// 路由表变化时是否立即带外追加一次通告
    pub reroute_on_new_node: bool,
    pub seed: u64,
    connection_range_km: f64,
}

impl Default for Context {
    fn default() -> Self {
        let ctx = Self {
            num_nodes: 10,
            area_km: 10.0,
            tx_power_dbm: 14.0,
            spreading_factor: 7,
            freq_mhz: 868.0,
            bandwidth_hz: 125_000.0,
            noise_figure_db: 6.0,
            path_loss_exponent: 2.7,
            d0_m: 1.0,
            fade_margin_db: 10.0,
            antenna_gains_db: 0.0,
            misc_losses_db: 0.0,
            routing_interval_secs: 2.0,
            data_interval_secs: 5.0,
            reroute_on_new_node: false,
            seed: 42,
            connection_range_km: 0.0,
        };
        ctx.derive_range().expect("default parameters are valid")
    }
}

impl Context {
    /// 由链路预算重新推导连接距离。扩频因子非法时整体失败，
    /// 调用方必须在失败时保持现有仿真不变。
    pub fn derive_range(mut self) -> Result<Self, ConfigError> {
        let range_m = radio::max_range(
            self.tx_power_dbm,
            self.spreading_factor,
            self.freq_mhz,
            self.bandwidth_hz,
            self.noise_figure_db,
            self.path_loss_exponent,
            self.d0_m,
            self.fade_margin_db,
            self.antenna_gains_db,
            self.misc_losses_db,
        )?;
        self.connection_range_km = range_m / 1000.0;
        Ok(self)
    }

    /// 推导出的连接距离（公里）
    pub fn connection_range_km(&self) -> f64 {
        self.connection_range_km
    }

    /// 路由表计算 RSSI/SNR 所需的信道常量
    pub fn link_params(&self) -> LinkParams {
        LinkParams {
            tx_power_dbm: self.tx_power_dbm,
            freq_mhz: self.freq_mhz,
            bandwidth_hz: self.bandwidth_hz,
            noise_figure_db: self.noise_figure_db,
            d0_m: self.d0_m,
            path_loss_exponent: self.path_loss_exponent,
        }
    }

    pub fn routing_interval(&self) -> SimTime {
        SimTime::from_secs_f64(self.routing_interval_secs)
    }

    pub fn data_interval(&self) -> SimTime {
        SimTime::from_secs_f64(self.data_interval_secs)
    }
}
