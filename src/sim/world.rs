//! 世界 trait
//!
//! 定义仿真世界接口。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由业务层实现（例如网状网络拓扑/统计等）。
///
/// `on_tick` 在每个事件执行完后被调用一次，业务层可在此处
/// 做跨节点的收尾工作（例如统计的滚动结算）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
