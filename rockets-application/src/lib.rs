//! 火箭遥测应用层（rockets-application）
//!
//! 为 `rockets-domain` 的核心契约提供内存实现与两侧边界服务：
//! - 内存事件存储与聚合存储（`event_store` / `rocket_store`）；
//! - 摄入服务（`ingest`）：载荷校验并映射为事件，接受即返回；
//! - 查询服务（`query`）：按频道读取与列表，读侧只有最终一致性。
//!
pub mod error;
pub mod event_store;
pub mod ingest;
pub mod query;
pub mod rocket_store;

pub use event_store::InMemoryEventStore;
pub use ingest::TelemetryIngest;
pub use query::RocketQueries;
pub use rocket_store::InMemoryRocketStore;
