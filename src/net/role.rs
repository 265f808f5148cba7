//! 节点角色
//!
//! 封闭的三种角色枚举，统一按名字序列化。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 网络出口：传感器数据的汇聚目标
    Gateway,
    Normal,
    /// 周期性产生数据并向最优网关发送
    Sensor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Gateway => write!(f, "GATEWAY"),
            Role::Normal => write!(f, "NORMAL"),
            Role::Sensor => write!(f, "SENSOR"),
        }
    }
}
