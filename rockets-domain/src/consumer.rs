//! 事件消费引擎（RocketEventConsumer）
//!
//! 以固定间隔轮询事件存储，将 Pending 事件按频道内序号严格有序、
//! 恰好一次地折叠进火箭聚合：
//! - 每频道维护下一期望序号（watermark），仅当序号命中时才应用；
//! - 序号超前视为缺口，留在 Pending 等待下一轮；
//! - 单个事件失败只推迟该事件本身，不影响同批其他事件与其他频道；
//! - 可选的重试上限策略，超限事件停靠为 Stuck；
//! - 提供关闭与等待的 `ConsumerHandle`。
//!
use crate::error::RocketResult;
use crate::event::{Event, EventId, EventPayload};
use crate::persist::{EventStore, RocketStore};
use crate::rocket::Rocket;
use bon::Builder;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 每个频道的首个期望序号
const FIRST_EXPECTED_SEQUENCE: u64 = 1;

/// 消费引擎配置
#[derive(Clone, Copy, Debug)]
pub struct ConsumerConfig {
    /// 轮询 Pending 事件的间隔
    pub poll_interval: Duration,
    /// 单个事件的最大应用尝试次数；`None` 表示无限重试
    pub max_attempts: Option<u32>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// RocketEventConsumer：
/// - 周期性从 `EventStore` 拉取 Pending 事件；
/// - 按（频道，序号）重排后逐个尝试应用到 `RocketStore` 中的聚合；
/// - watermark 为消费任务的私有状态，部署约束为单实例运行，
///   多实例并发会在同一频道的 watermark 上竞争并破坏有序性保证。
#[derive(Builder)]
pub struct RocketEventConsumer {
    event_store: Arc<dyn EventStore>,
    rocket_store: Arc<dyn RocketStore>,
    #[builder(default)]
    config: ConsumerConfig,
}

impl RocketEventConsumer {
    /// 启动消费循环，返回可用于关闭/等待的句柄
    pub fn start(self: Arc<Self>) -> ConsumerHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(Self::poll_loop(self.clone(), token.clone()));

        ConsumerHandle {
            token,
            task: Some(task),
        }
    }

    async fn poll_loop(self: Arc<Self>, token: CancellationToken) {
        info!("rocket event consumer started");

        // watermark 与尝试计数均为本任务私有，不与任何其他上下文共享
        let mut next: HashMap<String, u64> = HashMap::new();
        let mut attempts: HashMap<EventId, u32> = HashMap::new();

        let mut ticker = time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("rocket event consumer stopped");
                    break;
                }
                _ = ticker.tick() => self.tick(&mut next, &mut attempts).await,
            }
        }
    }

    /// 单轮扫描。取消信号只在轮次之间生效，不会中断单个事件的应用。
    async fn tick(
        &self,
        next: &mut HashMap<String, u64>,
        attempts: &mut HashMap<EventId, u32>,
    ) {
        let mut pending = match self.event_store.pending().await {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, "failed to list pending events");
                return;
            }
        };

        // 按（频道，序号）重排，使同频道的连续事件能在同一轮内依次应用；
        // 不依赖存储层的返回顺序
        pending.sort_by(|a, b| {
            a.channel()
                .cmp(b.channel())
                .then(a.sequence_number().cmp(&b.sequence_number()))
        });

        for event in pending {
            let watermark = next
                .entry(event.channel().to_string())
                .or_insert(FIRST_EXPECTED_SEQUENCE);

            if event.sequence_number() > *watermark {
                // 缺口：更早的序号尚未到达或尚未处理，留待后续轮次
                debug!(
                    channel = event.channel(),
                    sequence = event.sequence_number(),
                    expected = *watermark,
                    "sequence gap, leaving event pending"
                );
                continue;
            }

            if event.sequence_number() < *watermark {
                // 正确记账下不应出现；按已满足处理：标记 Processed 但不再应用
                warn!(
                    channel = event.channel(),
                    sequence = event.sequence_number(),
                    expected = *watermark,
                    "event behind watermark, marking processed without reapply"
                );
                if let Err(err) = self.event_store.mark_processed(event.event_id()).await {
                    warn!(
                        error = %err,
                        event_id = %event.event_id(),
                        "failed to mark stale event processed"
                    );
                }
                continue;
            }

            match self.consume(&event).await {
                Ok(()) => {
                    attempts.remove(event.event_id());
                    *watermark += 1;
                }
                Err(err) => {
                    // watermark 不前移，事件保持 Pending，下一轮重试
                    warn!(
                        error = %err,
                        event_id = %event.event_id(),
                        "failed to consume event, will retry"
                    );
                    self.note_failure(&event, attempts).await;
                }
            }
        }
    }

    /// 应用单个事件：读取（或新建）聚合 → 状态机转换 → 保存聚合 → 标记已处理
    async fn consume(&self, event: &Event) -> RocketResult<()> {
        debug!(
            event_id = %event.event_id(),
            kind = event.payload().kind(),
            "processing event"
        );

        let mut rocket = self
            .rocket_store
            .get(event.channel())
            .await?
            .unwrap_or_else(|| Rocket::new(event.channel()));

        if let EventPayload::Unknown { kind } = event.payload() {
            info!(
                kind = %kind,
                event_id = %event.event_id(),
                "ignoring unknown event kind"
            );
        }
        rocket.apply(event.payload())?;

        // 真实实现应将聚合保存与事件标记放入同一事务，避免两者状态不一致
        self.rocket_store.save(rocket).await?;
        self.event_store.mark_processed(event.event_id()).await?;

        Ok(())
    }

    /// 记录一次失败尝试；达到上限后将事件停靠为 Stuck，不再重试。
    /// watermark 不会越过 Stuck 事件，该频道会停在原地等待人工介入。
    async fn note_failure(&self, event: &Event, attempts: &mut HashMap<EventId, u32>) {
        let Some(max) = self.config.max_attempts else {
            return;
        };

        let count = attempts.entry(event.event_id().clone()).or_insert(0);
        *count += 1;

        if *count >= max {
            warn!(
                event_id = %event.event_id(),
                attempts = *count,
                "retry limit reached, parking event as stuck"
            );
            if let Err(err) = self
                .event_store
                .mark_stuck(event.event_id(), "retry limit reached")
                .await
            {
                warn!(
                    error = %err,
                    event_id = %event.event_id(),
                    "failed to park event as stuck"
                );
            }
            attempts.remove(event.event_id());
        }
    }
}

/// 消费循环句柄：用于优雅关闭与等待任务结束
pub struct ConsumerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConsumerHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
