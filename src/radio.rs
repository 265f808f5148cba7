//! 无线链路模型
//!
//! 基于对数距离路径损耗模型的纯数值计算：RSSI/SNR 正算，
//! 以及由链路预算反解最大通信距离。全部使用 f64，
//! 相同输入在任何平台上逐位可复现。

use thiserror::Error;

/// 链路模型配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 扩频因子必须在 7..=12 之间
    #[error("spreading factor {0} out of supported range 7..=12")]
    InvalidSpreadingFactor(u8),
}

/// 查表：各扩频因子成功解调所需的最低 SNR（dB）。
pub fn snr_floor(spreading_factor: u8) -> Result<f64, ConfigError> {
    match spreading_factor {
        7 => Ok(-7.5),
        8 => Ok(-10.0),
        9 => Ok(-12.5),
        10 => Ok(-15.0),
        11 => Ok(-17.5),
        12 => Ok(-20.0),
        sf => Err(ConfigError::InvalidSpreadingFactor(sf)),
    }
}

/// 参考距离 d0 处的自由空间路径损耗（dB）。
///
/// pl0 = 20*log10(d0_km) + 20*log10(freq_MHz) + 32.44
fn reference_path_loss(d0_m: f64, freq_mhz: f64) -> f64 {
    20.0 * (d0_m / 1000.0).log10() + 20.0 * freq_mhz.log10() + 32.44
}

/// 接收机热噪声底（dBm）。
///
/// noise_floor = -174 + 10*log10(BW_Hz) + NF
fn noise_floor(bandwidth_hz: f64, noise_figure_db: f64) -> f64 {
    -174.0 + 10.0 * bandwidth_hz.log10() + noise_figure_db
}

/// 计算给定距离处的 (RSSI dBm, SNR dB)。
///
/// 对数距离模型：pl = pl0 + 10*n*log10(d/d0)。无随机阴影衰落项，
/// 因此结果是确定性的。距离为 0 时 log10 按 IEEE-754 给出 -inf，
/// RSSI/SNR 相应为 +inf，由上层比较器自然处理。
pub fn link_quality(
    distance_km: f64,
    tx_power_dbm: f64,
    freq_mhz: f64,
    bandwidth_hz: f64,
    noise_figure_db: f64,
    d0_m: f64,
    path_loss_exponent: f64,
) -> (f64, f64) {
    let pl0 = reference_path_loss(d0_m, freq_mhz);
    let pl = pl0 + 10.0 * path_loss_exponent * (distance_km * 1000.0 / d0_m).log10();
    let rssi = tx_power_dbm - pl;
    let snr = rssi - noise_floor(bandwidth_hz, noise_figure_db);
    (rssi, snr)
}

/// 由链路预算反解最大通信距离（米）。
///
/// 接收灵敏度 = 噪声底 + SNR 下限；最大可容忍路径损耗
/// = 发射功率 + 天线增益 - 杂项损耗 - 衰落余量 - 灵敏度；
/// 再按对数距离模型反解距离。
#[allow(clippy::too_many_arguments)]
pub fn max_range(
    tx_power_dbm: f64,
    spreading_factor: u8,
    freq_mhz: f64,
    bandwidth_hz: f64,
    noise_figure_db: f64,
    path_loss_exponent: f64,
    d0_m: f64,
    fade_margin_db: f64,
    antenna_gains_db: f64,
    misc_losses_db: f64,
) -> Result<f64, ConfigError> {
    let snr_min = snr_floor(spreading_factor)?;
    let sensitivity = noise_floor(bandwidth_hz, noise_figure_db) + snr_min;
    let max_path_loss =
        tx_power_dbm + antenna_gains_db - misc_losses_db - fade_margin_db - sensitivity;
    let pl0 = reference_path_loss(d0_m, freq_mhz);
    Ok(d0_m * 10f64.powf((max_path_loss - pl0) / (10.0 * path_loss_exponent)))
}

/// 信道常量集合：路由表计算每条路由的 RSSI/SNR 时使用。
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParams {
    pub tx_power_dbm: f64,
    pub freq_mhz: f64,
    pub bandwidth_hz: f64,
    pub noise_figure_db: f64,
    pub d0_m: f64,
    pub path_loss_exponent: f64,
}

impl LinkParams {
    /// 给定距离处的 (RSSI, SNR)。
    pub fn link_quality(&self, distance_km: f64) -> (f64, f64) {
        link_quality(
            distance_km,
            self.tx_power_dbm,
            self.freq_mhz,
            self.bandwidth_hz,
            self.noise_figure_db,
            self.d0_m,
            self.path_loss_exponent,
        )
    }
}
