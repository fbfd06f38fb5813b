use rockets_application::{InMemoryEventStore, InMemoryRocketStore, RocketQueries, TelemetryIngest};
use rockets_domain::consumer::{ConsumerConfig, RocketEventConsumer};
use rockets_domain::persist::{EventStore, ListFilter, RocketStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let events = Arc::new(InMemoryEventStore::new());
    let rockets = Arc::new(InMemoryRocketStore::new());

    let ingest = TelemetryIngest::new(events.clone() as Arc<dyn EventStore>);
    let queries = RocketQueries::new(rockets.clone() as Arc<dyn RocketStore>);
    let consumer = Arc::new(
        RocketEventConsumer::builder()
            .event_store(events.clone() as Arc<dyn EventStore>)
            .rocket_store(rockets.clone() as Arc<dyn RocketStore>)
            .config(ConsumerConfig {
                poll_interval: Duration::from_millis(100),
                max_attempts: Some(3),
            })
            .build(),
    );
    let handle = consumer.start();

    // 模拟 webhook 投递：乱序到达并重复投递，外加一条爆炸后的非法加速
    let feed = vec![
        json!({
            "metadata": { "channel": "alpha", "messageNumber": 1, "messageType": "RocketLaunched" },
            "message": { "type": "Falcon", "launchSpeed": 100, "mission": "X" }
        }),
        json!({
            "metadata": { "channel": "alpha", "messageNumber": 3, "messageType": "RocketExploded" },
            "message": { "reason": "fuel leak" }
        }),
        json!({
            "metadata": { "channel": "alpha", "messageNumber": 2, "messageType": "RocketSpeedIncreased" },
            "message": { "by": 50 }
        }),
        // 重复投递，存储层按标识吸收
        json!({
            "metadata": { "channel": "alpha", "messageNumber": 2, "messageType": "RocketSpeedIncreased" },
            "message": { "by": 50 }
        }),
        // 爆炸之后的加速：状态机拒绝，重试 3 次后停靠为 Stuck
        json!({
            "metadata": { "channel": "alpha", "messageNumber": 4, "messageType": "RocketSpeedIncreased" },
            "message": { "by": 10 }
        }),
        json!({
            "metadata": { "channel": "beta", "messageNumber": 1, "messageType": "RocketLaunched" },
            "message": { "type": "Atlas", "launchSpeed": 200, "mission": "VOYAGER" }
        }),
        json!({
            "metadata": { "channel": "beta", "messageNumber": 2, "messageType": "RocketMissionChanged" },
            "message": { "newMission": "MARINER" }
        }),
    ];

    for value in feed {
        ingest.accept(serde_json::from_value(value)?).await?;
    }

    // 等待消费循环排空 Pending（含非法事件的停靠）
    while !events.pending().await?.is_empty() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    handle.shutdown();
    handle.join().await;

    for rocket in queries.list(ListFilter::default()).await? {
        println!(
            "channel={} type={} speed={} mission={} status={:?} reason={:?}",
            rocket.channel,
            rocket.rocket_type,
            rocket.speed,
            rocket.mission,
            rocket.status,
            rocket.reason
        );
    }

    Ok(())
}
