use crate::engine::MarketEngine;
use marketpulse_domain::entities::asset::AssetSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub type SharedSnapshot = Arc<Vec<AssetSnapshot>>;

/// A consumer-owned live feed. Each feed runs its own timer and random walk; two feeds
/// opened side by side drift apart.
///
/// Readers get whole `Arc` snapshots, so a reader holding an older one keeps a consistent
/// view while newer ticks are published.
pub struct FeedHandle {
    name: String,
    receiver: watch::Receiver<SharedSnapshot>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> watch::Receiver<SharedSnapshot> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> SharedSnapshot {
        self.receiver.borrow().clone()
    }

    pub fn stop(self) {
        self.task.abort();
        info!(feed = %self.name, "feed stopped");
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Publishes the engine's initial snapshot immediately, then one tick per `interval`.
///
/// Must be called from inside a tokio runtime.
pub fn spawn_feed(
    mut engine: MarketEngine,
    interval: Duration,
    name: impl Into<String>,
) -> Result<FeedHandle, String> {
    if interval.is_zero() {
        return Err("feed interval must be > 0".to_string());
    }
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|err| format!("feed requires a tokio runtime: {err}"))?;

    let name = name.into();
    let initial: SharedSnapshot = Arc::new(engine.initial_snapshot());
    let (tx, receiver) = watch::channel(initial.clone());

    let task_name = name.clone();
    let task = runtime.spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut current = initial;
        let mut ticks: u64 = 0;

        loop {
            ticker.tick().await;
            let next: SharedSnapshot = Arc::new(engine.tick(&current));
            ticks = ticks.saturating_add(1);
            metrics::counter!("marketpulse.feed.ticks", "feed" => task_name.clone()).increment(1);

            if tx.send(next.clone()).is_err() {
                debug!(feed = %task_name, ticks, "no subscribers left, feed exiting");
                return;
            }
            current = next;
        }
    });

    info!(feed = %name, interval_secs = interval.as_secs_f64(), "feed started");
    Ok(FeedHandle {
        name,
        receiver,
        task,
    })
}
