use marketpulse_application::engine::MarketEngine;
use marketpulse_application::feed::spawn_feed;
use marketpulse_domain::entities::market_config::MarketConfig;
use marketpulse_domain::repositories::clock::FixedClock;
use marketpulse_domain::repositories::random_source::ScriptedRandomSource;
use marketpulse_infrastructure::random::StdRandomSource;
use std::sync::Arc;
use std::time::Duration;

fn scripted_engine(value: f64) -> MarketEngine {
    MarketEngine::new(
        Arc::new(MarketConfig::reference()),
        Box::new(ScriptedRandomSource::constant(value).unwrap()),
        Arc::new(FixedClock {
            now_millis: 1_700_000_000_000,
        }),
    )
}

#[tokio::test(start_paused = true)]
async fn publishes_initial_snapshot_then_ticks_on_interval() {
    let handle = spawn_feed(scripted_engine(0.75), Duration::from_secs(30), "home").unwrap();
    let mut rx = handle.subscribe();

    let first = rx.borrow_and_update().clone();
    assert_eq!(first.len(), 10);

    let started = tokio::time::Instant::now();
    rx.changed().await.unwrap();
    let second = rx.borrow_and_update().clone();

    assert!(started.elapsed() >= Duration::from_secs(30));
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second[0].current_price > first[0].current_price);
    assert_eq!(second[0].asset.base_price, 45_000.0);
    assert!(second.iter().all(|s| s.is_within_range()));

    rx.changed().await.unwrap();
    let third = rx.borrow_and_update().clone();
    assert!(third[0].current_price > second[0].current_price);
    assert!(third[0].high_24h >= second[0].high_24h);
}

#[tokio::test(start_paused = true)]
async fn stale_snapshot_stays_readable_after_new_ticks() {
    let handle = spawn_feed(scripted_engine(0.25), Duration::from_secs(30), "table").unwrap();
    let stale = handle.latest();
    let stale_copy: Vec<_> = stale.iter().cloned().collect();

    let mut rx = handle.subscribe();
    for _ in 0..3 {
        rx.changed().await.unwrap();
    }

    assert_eq!(*stale, stale_copy);
    assert!(handle.latest()[0].current_price < stale[0].current_price);
}

#[tokio::test(start_paused = true)]
async fn side_by_side_feeds_diverge() {
    let config = Arc::new(MarketConfig::reference());
    let clock = Arc::new(FixedClock {
        now_millis: 1_700_000_000_000,
    });
    let a = MarketEngine::new(config.clone(), Box::new(StdRandomSource::seeded(1)), clock.clone());
    let b = MarketEngine::new(config, Box::new(StdRandomSource::seeded(2)), clock);

    let feed_a = spawn_feed(a, Duration::from_secs(30), "a").unwrap();
    let feed_b = spawn_feed(b, Duration::from_secs(30), "b").unwrap();
    let mut rx_a = feed_a.subscribe();
    let mut rx_b = feed_b.subscribe();
    rx_a.changed().await.unwrap();
    rx_b.changed().await.unwrap();

    assert_ne!(feed_a.latest()[0].current_price, feed_b.latest()[0].current_price);
}

#[tokio::test(start_paused = true)]
async fn stopping_the_feed_closes_the_channel() {
    let handle = spawn_feed(scripted_engine(0.5), Duration::from_secs(30), "settings").unwrap();
    let mut rx = handle.subscribe();
    let _ = rx.borrow_and_update();

    handle.stop();
    assert!(rx.changed().await.is_err());
}

#[tokio::test]
async fn rejects_zero_interval() {
    let err = spawn_feed(scripted_engine(0.5), Duration::ZERO, "bad")
        .err()
        .expect("zero interval must fail");
    assert!(err.contains("interval"));
}

#[test]
fn requires_a_runtime() {
    let err = spawn_feed(scripted_engine(0.5), Duration::from_secs(1), "no-rt")
        .err()
        .expect("spawning outside a runtime must fail");
    assert!(err.contains("tokio runtime"));
}
