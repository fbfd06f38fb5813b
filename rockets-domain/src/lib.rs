//! 火箭遥测核心（rockets-domain）
//!
//! 提供有序、恰好一次的遥测事件消费管道的领域构件：
//! - 事件模型（`event`）：确定性标识、一次性的状态流转与未知负载兼容；
//! - 火箭聚合（`rocket`）：每类事件一个合法性受控的状态转换；
//! - 存储契约（`persist`）：事件存储与聚合存储的协议；
//! - 消费引擎（`consumer`）：按频道 watermark 严格排序的轮询消费。
//!
//! 本 crate 只定义领域语义与最小必要的错误类型，不绑定传输与存储实现；
//! 内存存储与摄入/查询边界服务见 `rockets-application`。
//!
pub mod consumer;
pub mod error;
pub mod event;
pub mod persist;
pub mod rocket;
