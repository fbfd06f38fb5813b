//! 内存版聚合存储（InMemoryRocketStore）
//!
//! 以频道为键的 `DashMap`，满足 `RocketStore` 契约：
//! get 未找到返回 `None`、save 为后写胜出的 upsert、list 支持任务名过滤。
//!
use async_trait::async_trait;
use dashmap::DashMap;
use rockets_domain::error::RocketResult;
use rockets_domain::persist::{ListFilter, RocketStore};
use rockets_domain::rocket::Rocket;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryRocketStore {
    rockets: DashMap<String, Rocket>,
}

impl InMemoryRocketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RocketStore for InMemoryRocketStore {
    async fn get(&self, channel: &str) -> RocketResult<Option<Rocket>> {
        Ok(self.rockets.get(channel).map(|r| r.clone()))
    }

    async fn save(&self, rocket: Rocket) -> RocketResult<()> {
        debug!(channel = rocket.channel(), "rocket saved");
        self.rockets.insert(rocket.channel().to_string(), rocket);

        Ok(())
    }

    async fn list(&self, filter: ListFilter) -> RocketResult<Vec<Rocket>> {
        Ok(self
            .rockets
            .iter()
            .filter(|r| {
                filter
                    .mission
                    .as_deref()
                    .is_none_or(|mission| r.mission() == mission)
            })
            .map(|r| r.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(channel: &str, mission: &str) -> Rocket {
        let mut rocket = Rocket::new(channel);
        rocket.apply_launched("Falcon", 100, mission).unwrap();
        rocket
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_channel() {
        let store = InMemoryRocketStore::new();
        assert!(store.get("alpha").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_upserts_by_channel() {
        let store = InMemoryRocketStore::new();
        store.save(active("alpha", "X")).await.unwrap();

        let mut updated = store.get("alpha").await.unwrap().unwrap();
        updated.apply_speed_increased(50).unwrap();
        store.save(updated).await.unwrap();

        let rocket = store.get("alpha").await.unwrap().unwrap();
        assert_eq!(rocket.speed(), 150);
        assert_eq!(store.rockets.len(), 1);
    }

    #[tokio::test]
    async fn list_applies_mission_filter() {
        let store = InMemoryRocketStore::new();
        store.save(active("alpha", "X")).await.unwrap();
        store.save(active("beta", "Y")).await.unwrap();
        store.save(active("gamma", "X")).await.unwrap();

        let all = store.list(ListFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let filtered = store
            .list(ListFilter {
                mission: Some("X".to_string()),
            })
            .await
            .unwrap();
        let mut channels: Vec<_> = filtered.iter().map(|r| r.channel().to_string()).collect();
        channels.sort();
        assert_eq!(channels, vec!["alpha", "gamma"]);
    }
}
