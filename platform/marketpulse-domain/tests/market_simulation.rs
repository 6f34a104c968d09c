use marketpulse_domain::entities::market_config::MarketConfig;
use marketpulse_domain::repositories::clock::FixedClock;
use marketpulse_domain::repositories::random_source::ScriptedRandomSource;
use marketpulse_domain::services::history::HistoricalSeriesGenerator;
use marketpulse_domain::services::live_store::LiveAssetStore;
use marketpulse_domain::value_objects::instrument_type::InstrumentType;
use std::sync::Arc;

#[test]
fn initial_snapshot_matches_catalog_ids_and_order() {
    let config = Arc::new(MarketConfig::reference());
    let store = LiveAssetStore::new(config.clone());
    let mut random = ScriptedRandomSource::new(vec![0.1, 0.4, 0.7, 0.2, 0.9]).unwrap();

    let snapshot = store.initial_snapshot(&mut random);
    let catalog_ids: Vec<&str> = config.catalog.entries().iter().map(|a| a.id.as_str()).collect();
    let snapshot_ids: Vec<&str> = snapshot.iter().map(|s| s.id()).collect();

    assert_eq!(catalog_ids, snapshot_ids);
    assert_eq!(
        snapshot.iter().filter(|s| s.asset.kind == InstrumentType::Crypto).count(),
        5
    );
    assert_eq!(
        snapshot.iter().filter(|s| s.asset.kind == InstrumentType::Stock).count(),
        5
    );
}

#[test]
fn independent_markets_share_nothing() {
    let config = Arc::new(MarketConfig::reference());
    let store = LiveAssetStore::new(config);
    let mut up = ScriptedRandomSource::constant(0.9).unwrap();
    let mut down = ScriptedRandomSource::constant(0.1).unwrap();

    let start = store.initial_snapshot(&mut ScriptedRandomSource::constant(0.5).unwrap());
    let a = store.tick(&store.tick(&start, &mut up), &mut up);
    let b = store.tick(&store.tick(&start, &mut down), &mut down);

    assert!(a[0].current_price > start[0].current_price);
    assert!(b[0].current_price < start[0].current_price);
    assert_eq!(start[0].current_price, 45_000.0);
}

#[test]
fn repeated_history_calls_are_not_replayed() {
    let generator = HistoricalSeriesGenerator::new(Arc::new(MarketConfig::reference()));
    let clock = FixedClock {
        now_millis: 1_700_000_000_000,
    };
    let mut random = ScriptedRandomSource::new(vec![0.2, 0.5, 0.8, 0.1, 0.6, 0.3, 0.95]).unwrap();

    let first = generator.generate("btc", None, &mut random, &clock).unwrap();
    let second = generator.generate("btc", None, &mut random, &clock).unwrap();

    assert_eq!(first.len(), 169);
    assert_eq!(second.len(), 169);
    assert_ne!(first, second);
}
