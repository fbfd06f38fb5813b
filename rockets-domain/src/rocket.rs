//! 火箭聚合（Rocket）
//!
//! 单个频道火箭生命周期的当前状态投影与状态机：
//! 每类事件对应一个状态转换方法，校验不通过时不修改任何字段。
//! 聚合惰性物化——频道的首个 `Launched` 事件成功应用时创建。
//!
use crate::error::{RocketError, RocketResult};
use crate::event::EventPayload;
use serde::{Deserialize, Serialize};

/// 火箭状态：Unlaunched（尚未收到发射事件）→ Active → Exploded（终态）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RocketStatus {
    #[default]
    Unlaunched,
    Active,
    Exploded,
}

/// 火箭聚合：一个频道所有事件按序折叠后的当前状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    channel: String,
    #[serde(rename = "type")]
    rocket_type: String,
    speed: i64,
    mission: String,
    status: RocketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Rocket {
    /// 为频道创建未发射的新聚合
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn rocket_type(&self) -> &str {
        &self.rocket_type
    }

    pub fn speed(&self) -> i64 {
        self.speed
    }

    pub fn mission(&self) -> &str {
        &self.mission
    }

    pub fn status(&self) -> RocketStatus {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// 按事件负载分发到对应的状态转换；未知负载为无操作
    pub fn apply(&mut self, payload: &EventPayload) -> RocketResult<()> {
        match payload {
            EventPayload::Launched {
                rocket_type,
                launch_speed,
                mission,
            } => self.apply_launched(rocket_type, *launch_speed, mission),
            EventPayload::SpeedIncreased { by } => self.apply_speed_increased(*by),
            EventPayload::SpeedDecreased { by } => self.apply_speed_decreased(*by),
            EventPayload::Exploded { reason } => self.apply_exploded(reason),
            EventPayload::MissionChanged { new_mission } => {
                self.apply_mission_changed(new_mission)
            }
            EventPayload::Unknown { .. } => Ok(()),
        }
    }

    /// 发射：仅允许尚未发射的火箭
    pub fn apply_launched(
        &mut self,
        rocket_type: &str,
        launch_speed: i64,
        mission: &str,
    ) -> RocketResult<()> {
        if self.status != RocketStatus::Unlaunched {
            return Err(RocketError::AlreadyLaunched);
        }

        self.rocket_type = rocket_type.to_string();
        self.speed = launch_speed;
        self.mission = mission.to_string();
        self.status = RocketStatus::Active;

        Ok(())
    }

    /// 加速：爆炸后拒绝
    pub fn apply_speed_increased(&mut self, by: i64) -> RocketResult<()> {
        if self.status == RocketStatus::Exploded {
            return Err(RocketError::RocketExploded);
        }

        self.speed += by;

        Ok(())
    }

    /// 减速：爆炸后拒绝；速度允许为负，未设下限
    pub fn apply_speed_decreased(&mut self, by: i64) -> RocketResult<()> {
        if self.status == RocketStatus::Exploded {
            return Err(RocketError::RocketExploded);
        }

        self.speed -= by;

        Ok(())
    }

    /// 任务变更：未校验爆炸状态，与其他变更不一致，是否应当拒绝待产品确认
    pub fn apply_mission_changed(&mut self, new_mission: &str) -> RocketResult<()> {
        self.mission = new_mission.to_string();

        Ok(())
    }

    /// 爆炸：终态流转，记录原因；重复爆炸拒绝
    pub fn apply_exploded(&mut self, reason: &str) -> RocketResult<()> {
        if self.status == RocketStatus::Exploded {
            return Err(RocketError::AlreadyExploded);
        }

        self.status = RocketStatus::Exploded;
        self.reason = Some(reason.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launched() -> Rocket {
        let mut rocket = Rocket::new("alpha");
        rocket.apply_launched("Falcon", 100, "X").unwrap();
        rocket
    }

    #[test]
    fn launch_activates_fresh_rocket() {
        let rocket = launched();
        assert_eq!(rocket.status(), RocketStatus::Active);
        assert_eq!(rocket.rocket_type(), "Falcon");
        assert_eq!(rocket.speed(), 100);
        assert_eq!(rocket.mission(), "X");
        assert_eq!(rocket.reason(), None);
    }

    #[test]
    fn relaunch_is_rejected_and_state_unchanged() {
        let mut rocket = launched();
        let err = rocket.apply_launched("Saturn", 1, "Y").unwrap_err();
        assert!(matches!(err, RocketError::AlreadyLaunched));
        assert_eq!(rocket.rocket_type(), "Falcon");
        assert_eq!(rocket.speed(), 100);

        rocket.apply_exploded("fuel leak").unwrap();
        let err = rocket.apply_launched("Saturn", 1, "Y").unwrap_err();
        assert!(matches!(err, RocketError::AlreadyLaunched));
        assert_eq!(rocket.status(), RocketStatus::Exploded);
    }

    #[test]
    fn speed_changes_accumulate_and_may_go_negative() {
        let mut rocket = launched();
        rocket.apply_speed_increased(50).unwrap();
        assert_eq!(rocket.speed(), 150);
        rocket.apply_speed_decreased(200).unwrap();
        assert_eq!(rocket.speed(), -50);
    }

    #[test]
    fn mutations_after_explosion_are_rejected() {
        let mut rocket = launched();
        rocket.apply_exploded("fuel leak").unwrap();
        assert_eq!(rocket.reason(), Some("fuel leak"));

        let err = rocket.apply_speed_increased(10).unwrap_err();
        assert!(matches!(err, RocketError::RocketExploded));
        let err = rocket.apply_speed_decreased(10).unwrap_err();
        assert!(matches!(err, RocketError::RocketExploded));
        let err = rocket.apply_exploded("again").unwrap_err();
        assert!(matches!(err, RocketError::AlreadyExploded));

        assert_eq!(rocket.speed(), 100);
        assert_eq!(rocket.reason(), Some("fuel leak"));
    }

    #[test]
    fn mission_change_has_no_exploded_guard() {
        // 保留参考行为：爆炸后仍允许任务变更
        let mut rocket = launched();
        rocket.apply_exploded("fuel leak").unwrap();
        rocket.apply_mission_changed("Y").unwrap();
        assert_eq!(rocket.mission(), "Y");
        assert_eq!(rocket.status(), RocketStatus::Exploded);
    }

    #[test]
    fn unknown_payload_is_a_noop() {
        let mut rocket = launched();
        let before = rocket.clone();
        rocket
            .apply(&EventPayload::Unknown {
                kind: "RocketRefueled".into(),
            })
            .unwrap();
        assert_eq!(rocket, before);
    }

    #[test]
    fn concrete_alpha_scenario() {
        let mut rocket = Rocket::new("alpha");
        rocket
            .apply(&EventPayload::Launched {
                rocket_type: "Falcon".into(),
                launch_speed: 100,
                mission: "X".into(),
            })
            .unwrap();
        rocket.apply(&EventPayload::SpeedIncreased { by: 50 }).unwrap();
        rocket
            .apply(&EventPayload::Exploded {
                reason: "fuel leak".into(),
            })
            .unwrap();

        assert_eq!(rocket.channel(), "alpha");
        assert_eq!(rocket.rocket_type(), "Falcon");
        assert_eq!(rocket.speed(), 150);
        assert_eq!(rocket.mission(), "X");
        assert_eq!(rocket.status(), RocketStatus::Exploded);
        assert_eq!(rocket.reason(), Some("fuel leak"));

        let err = rocket
            .apply(&EventPayload::SpeedIncreased { by: 10 })
            .unwrap_err();
        assert!(matches!(err, RocketError::RocketExploded));
        assert_eq!(rocket.speed(), 150);
    }
}
