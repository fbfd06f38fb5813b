//! 内存版事件存储（InMemoryEventStore）
//!
//! 以事件标识为键的 `DashMap`，另维护一个按插入序的 Pending 索引。
//! 满足 `EventStore` 契约：按标识去重、Pending 列表、幂等的终态标记；
//! 典型用途：测试环境、示例与单实例本地部署，可替换为持久化后端。
//!
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rockets_domain::error::{RocketError, RocketResult};
use rockets_domain::event::{Event, EventId};
use rockets_domain::persist::EventStore;
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Default)]
pub struct InMemoryEventStore {
    events: DashMap<EventId, Event>,
    // Pending 索引按插入序保存标识；消费方不依赖该顺序
    pending: Mutex<Vec<EventId>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending_index(&self) -> RocketResult<std::sync::MutexGuard<'_, Vec<EventId>>> {
        self.pending.lock().map_err(|_| RocketError::EventStore {
            reason: "pending index lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save_event(&self, event: Event) -> RocketResult<()> {
        let id = event.event_id().clone();

        match self.events.entry(id.clone()) {
            Entry::Occupied(_) => {
                debug!(event_id = %id, "duplicate event ignored");
            }
            Entry::Vacant(slot) => {
                slot.insert(event);
                self.pending_index()?.push(id.clone());
                debug!(event_id = %id, "event saved");
            }
        }

        Ok(())
    }

    async fn pending(&self) -> RocketResult<Vec<Event>> {
        let index = self.pending_index()?.clone();

        Ok(index
            .iter()
            .filter_map(|id| self.events.get(id).map(|e| e.clone()))
            .collect())
    }

    async fn mark_processed(&self, event_id: &EventId) -> RocketResult<()> {
        if let Some(mut entry) = self.events.get_mut(event_id) {
            entry.mark_processed();
            debug!(event_id = %event_id, "event marked processed");
        }

        self.pending_index()?.retain(|id| id != event_id);

        Ok(())
    }

    async fn mark_stuck(&self, event_id: &EventId, reason: &str) -> RocketResult<()> {
        if let Some(mut entry) = self.events.get_mut(event_id) {
            entry.mark_stuck();
            warn!(event_id = %event_id, reason, "event parked as stuck");
        }

        self.pending_index()?.retain(|id| id != event_id);

        Ok(())
    }
}
