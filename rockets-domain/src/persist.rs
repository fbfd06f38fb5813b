//! 存储契约（persist）
//!
//! 定义事件存储与聚合存储的协议：
//! - 事件存储（`EventStore`）：按标识去重的追加式记录与 Pending 索引；
//! - 聚合存储（`RocketStore`）：按频道键控的火箭投影读写与列表。
//!
//! 该模块只约定行为与并发要求，不绑定具体后端；参考实现为内存存储，
//! 可替换为持久化日志与键值存储而不改变契约。所有操作都必须允许
//! 摄入方与消费方并发调用。
//!
use crate::error::RocketResult;
use crate::event::{Event, EventId};
use crate::rocket::Rocket;
use async_trait::async_trait;
use std::sync::Arc;

/// 事件存储：以事件标识去重的追加式记录
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 保存事件；标识已存在时不做任何修改并返回成功——这是重复投递的幂等边界。
    /// 不得基于序号排序或拒绝，排序是消费方的职责。
    async fn save_event(&self, event: Event) -> RocketResult<()>;

    /// 列出所有 Pending 状态的事件；返回顺序不作承诺，消费方自行按频道重排
    async fn pending(&self) -> RocketResult<Vec<Event>>;

    /// 幂等地将事件置为 Processed；事件不存在或已处理时为无操作
    async fn mark_processed(&self, event_id: &EventId) -> RocketResult<()>;

    /// 将事件置为 Stuck（超出重试上限后的终态停靠），不再出现在 Pending 中
    async fn mark_stuck(&self, event_id: &EventId, reason: &str) -> RocketResult<()>;
}

#[async_trait]
impl<T> EventStore for Arc<T>
where
    T: EventStore + ?Sized,
{
    async fn save_event(&self, event: Event) -> RocketResult<()> {
        (**self).save_event(event).await
    }

    async fn pending(&self) -> RocketResult<Vec<Event>> {
        (**self).pending().await
    }

    async fn mark_processed(&self, event_id: &EventId) -> RocketResult<()> {
        (**self).mark_processed(event_id).await
    }

    async fn mark_stuck(&self, event_id: &EventId, reason: &str) -> RocketResult<()> {
        (**self).mark_stuck(event_id, reason).await
    }
}

/// 聚合列表过滤条件；空条件表示返回全部
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// 按任务名过滤
    pub mission: Option<String>,
}

/// 聚合存储：按频道键控的火箭投影
#[async_trait]
pub trait RocketStore: Send + Sync {
    /// 读取频道当前聚合；未找到返回 `None`（消费方视为频道首个事件、新建聚合）
    async fn get(&self, channel: &str) -> RocketResult<Option<Rocket>>;

    /// 以频道为键 upsert，后写胜出
    async fn save(&self, rocket: Rocket) -> RocketResult<()>;

    /// 列出聚合；无过滤条件时返回全部
    async fn list(&self, filter: ListFilter) -> RocketResult<Vec<Rocket>>;
}

#[async_trait]
impl<T> RocketStore for Arc<T>
where
    T: RocketStore + ?Sized,
{
    async fn get(&self, channel: &str) -> RocketResult<Option<Rocket>> {
        (**self).get(channel).await
    }

    async fn save(&self, rocket: Rocket) -> RocketResult<()> {
        (**self).save(rocket).await
    }

    async fn list(&self, filter: ListFilter) -> RocketResult<Vec<Rocket>> {
        (**self).list(filter).await
    }
}
