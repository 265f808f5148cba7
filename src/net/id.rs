//! 标识符类型
//!
//! 定义节点在注册表中的唯一标识符。协议层面的身份是节点名字符串，
//! NodeId 只是注册表下标。

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);
