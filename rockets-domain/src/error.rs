//! 领域层统一错误定义
//!
//! 聚焦状态机合法性与存储操作的最小必要集合，
//! 便于在各实现层统一转换为 `RocketError`。
//!
use thiserror::Error;

/// 统一错误类型（核心管道最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RocketError {
    // --- 聚合状态规则 ---
    #[error("rocket already launched")]
    AlreadyLaunched,
    #[error("rocket already exploded")]
    AlreadyExploded,
    #[error("rocket has exploded")]
    RocketExploded,

    // --- 存储 ---
    #[error("event store error: {reason}")]
    EventStore { reason: String },
    #[error("rocket store error: {reason}")]
    RocketStore { reason: String },

    // --- 事件校验 ---
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },
}

/// 统一 Result 类型别名
pub type RocketResult<T> = Result<T, RocketError>;
