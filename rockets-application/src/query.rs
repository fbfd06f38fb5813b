//! 读侧查询服务（query）
//!
//! 读取聚合存储的当前内容；与摄入之间只有最终一致性，不保证读己之写。
//! 返回与聚合解耦、序列化友好的 DTO。
//!
use crate::error::AppError;
use rockets_domain::persist::{ListFilter, RocketStore};
use rockets_domain::rocket::{Rocket, RocketStatus};
use serde::Serialize;
use std::sync::Arc;

/// 面向接口层的火箭投影 DTO
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocketDto {
    pub channel: String,
    #[serde(rename = "type")]
    pub rocket_type: String,
    pub speed: i64,
    pub mission: String,
    pub status: RocketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Rocket> for RocketDto {
    fn from(rocket: Rocket) -> Self {
        Self {
            channel: rocket.channel().to_string(),
            rocket_type: rocket.rocket_type().to_string(),
            speed: rocket.speed(),
            mission: rocket.mission().to_string(),
            status: rocket.status(),
            reason: rocket.reason().map(|r| r.to_string()),
        }
    }
}

/// 查询服务：按频道读取与列表
pub struct RocketQueries {
    rocket_store: Arc<dyn RocketStore>,
}

impl RocketQueries {
    pub fn new(rocket_store: Arc<dyn RocketStore>) -> Self {
        Self { rocket_store }
    }

    /// 按频道读取当前聚合；没有任何已应用事件的频道报告未找到
    pub async fn get(&self, channel: &str) -> Result<RocketDto, AppError> {
        self.rocket_store
            .get(channel)
            .await?
            .map(RocketDto::from)
            .ok_or_else(|| AppError::RocketNotFound(channel.to_string()))
    }

    /// 列出聚合；按频道名排序保证输出稳定
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<RocketDto>, AppError> {
        let mut rockets = self.rocket_store.list(filter).await?;
        rockets.sort_by(|a, b| a.channel().cmp(b.channel()));

        Ok(rockets.into_iter().map(RocketDto::from).collect())
    }
}
