//! 平面几何
//!
//! 节点位置（公里）与欧氏距离。

use serde::{Deserialize, Serialize};

/// 节点位置（x, y 单位：公里）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x_km: f64,
    pub y_km: f64,
}

impl Position {
    pub fn new(x_km: f64, y_km: f64) -> Self {
        Self { x_km, y_km }
    }

    /// 两点间欧氏距离（公里）
    pub fn distance_km(&self, other: &Position) -> f64 {
        let dx = self.x_km - other.x_km;
        let dy = self.y_km - other.y_km;
        (dx * dx + dy * dy).sqrt()
    }
}
