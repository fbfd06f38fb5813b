//! 遥测事件模型（Event）
//!
//! 定义事件在存储层的标准形态：
//! - 以 `channel` + `sequence_number` 确定性推导的事件标识；
//! - 一次性的状态流转（Pending → Processed / Stuck）；
//! - 面向未来生产者的未知负载兼容（`EventPayload::Unknown`）。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// 事件唯一标识
///
/// 由 `channel` 与 `sequence_number` 确定性推导，同一逻辑事件的重复投递
/// 总是映射到同一标识，存储层按标识去重即可满足幂等。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    pub fn derive(channel: &str, sequence_number: u64) -> Self {
        Self(format!("{channel}-{sequence_number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 事件处理状态：`Pending` 为初始态，`Processed` 与 `Stuck` 均为终态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Processed,
    Stuck,
}

/// 事件负载（按事件种类区分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    Launched {
        rocket_type: String,
        launch_speed: i64,
        mission: String,
    },
    SpeedIncreased {
        by: i64,
    },
    SpeedDecreased {
        by: i64,
    },
    Exploded {
        reason: String,
    },
    MissionChanged {
        new_mission: String,
    },
    /// 未识别的事件种类：保留生产方的原始类型名，消费时按无操作忽略
    Unknown {
        kind: String,
    },
}

impl EventPayload {
    /// 事件种类名（用于日志与审计）
    pub fn kind(&self) -> &str {
        match self {
            EventPayload::Launched { .. } => "RocketLaunched",
            EventPayload::SpeedIncreased { .. } => "RocketSpeedIncreased",
            EventPayload::SpeedDecreased { .. } => "RocketSpeedDecreased",
            EventPayload::Exploded { .. } => "RocketExploded",
            EventPayload::MissionChanged { .. } => "RocketMissionChanged",
            EventPayload::Unknown { kind } => kind,
        }
    }
}

/// 遥测事件：除 `status` 外所有字段一经存储不可变
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct Event {
    /// 事件唯一标识符（channel-sequence 组合）
    event_id: EventId,
    /// 事件所属频道，所有排序与聚合状态均按频道划定
    channel: String,
    /// 频道内 1 起始的逻辑位点，最终应构成无缺口的连续序列
    sequence_number: u64,
    /// 事件处理状态
    #[builder(default)]
    status: EventStatus,
    /// 生产方携带的消息时间（原样保存，不参与排序）
    message_time: Option<String>,
    /// 进入存储的时间
    #[builder(default = Utc::now())]
    received_at: DateTime<Utc>,
    /// 事件负载
    payload: EventPayload,
}

impl Event {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn message_time(&self) -> Option<&str> {
        self.message_time.as_deref()
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// 置为 Processed；仅允许从 Pending 流转，终态不可逆
    pub fn mark_processed(&mut self) {
        if self.status == EventStatus::Pending {
            self.status = EventStatus::Processed;
        }
    }

    /// 置为 Stuck；仅允许从 Pending 流转，终态不可逆
    pub fn mark_stuck(&mut self) {
        if self.status == EventStatus::Pending {
            self.status = EventStatus::Stuck;
        }
    }
}
