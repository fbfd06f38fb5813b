//! 遥测摄入服务（ingest）
//!
//! 将外部传输层解码出的载荷映射为事件并写入事件存储：
//! 校验（频道非空、序号 ≥ 1）→ 派生标识 → 以 Pending 状态保存。
//! 返回成功仅表示事件已被接收，聚合状态的更新由消费方异步完成（最终一致）。
//! 传输细节（HTTP、鉴权、限流）由外部协作方负责，不在本层。
//!
use crate::error::AppError;
use rockets_domain::event::{Event, EventId, EventPayload};
use rockets_domain::persist::EventStore;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// 外部遥测载荷：`metadata` 携带路由与排序信息，`message` 携带事件种类字段
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryEnvelope {
    pub metadata: TelemetryMetadata,
    pub message: TelemetryMessage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryMetadata {
    pub channel: String,
    pub message_number: u64,
    #[serde(default)]
    pub message_time: Option<String>,
    pub message_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryMessage {
    #[serde(rename = "type")]
    pub rocket_type: Option<String>,
    pub launch_speed: Option<i64>,
    pub mission: Option<String>,
    pub new_mission: Option<String>,
    pub reason: Option<String>,
    pub by: Option<i64>,
}

/// 摄入服务：载荷 → 事件的映射与入库
pub struct TelemetryIngest {
    event_store: Arc<dyn EventStore>,
}

impl TelemetryIngest {
    pub fn new(event_store: Arc<dyn EventStore>) -> Self {
        Self { event_store }
    }

    /// 接收一条遥测载荷；重复投递由存储层按标识吸收，不报错
    pub async fn accept(&self, envelope: TelemetryEnvelope) -> Result<(), AppError> {
        if envelope.metadata.channel.is_empty() {
            return Err(AppError::Validation("channel must not be empty".to_string()));
        }
        if envelope.metadata.message_number < 1 {
            return Err(AppError::Validation(
                "messageNumber must be >= 1".to_string(),
            ));
        }

        let TelemetryEnvelope { metadata, message } = envelope;
        let payload = map_payload(&metadata.message_type, message);

        let event = Event::builder()
            .event_id(EventId::derive(&metadata.channel, metadata.message_number))
            .channel(metadata.channel)
            .sequence_number(metadata.message_number)
            .maybe_message_time(metadata.message_time)
            .payload(payload)
            .build();

        info!(
            event_id = %event.event_id(),
            kind = event.payload().kind(),
            "telemetry accepted"
        );
        self.event_store.save_event(event).await?;

        Ok(())
    }
}

/// 按消息类型映射负载；未识别的类型保留原名，由消费方按无操作忽略
fn map_payload(message_type: &str, message: TelemetryMessage) -> EventPayload {
    match message_type {
        "RocketLaunched" => EventPayload::Launched {
            rocket_type: message.rocket_type.unwrap_or_default(),
            launch_speed: message.launch_speed.unwrap_or_default(),
            mission: message.mission.unwrap_or_default(),
        },
        "RocketSpeedIncreased" => EventPayload::SpeedIncreased {
            by: message.by.unwrap_or_default(),
        },
        "RocketSpeedDecreased" => EventPayload::SpeedDecreased {
            by: message.by.unwrap_or_default(),
        },
        "RocketExploded" => EventPayload::Exploded {
            reason: message.reason.unwrap_or_default(),
        },
        // 任务变更载荷的字段名有两种写法，newMission 优先
        "RocketMissionChanged" => EventPayload::MissionChanged {
            new_mission: message.new_mission.or(message.mission).unwrap_or_default(),
        },
        other => EventPayload::Unknown {
            kind: other.to_string(),
        },
    }
}
