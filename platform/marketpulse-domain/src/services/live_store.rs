use crate::entities::asset::{change_against, AssetSnapshot};
use crate::entities::market_config::MarketConfig;
use crate::repositories::random_source::RandomSource;
use crate::services::random_walk::{fluctuate, uniform};
use std::sync::Arc;

pub const MARKET_CAP_MULTIPLIER_MIN: f64 = 1e8;
pub const MARKET_CAP_MULTIPLIER_MAX: f64 = 1.1e9;
pub const VOLUME_24H_MIN: f64 = 1e9;
pub const VOLUME_24H_MAX: f64 = 6e9;

/// Builds and advances live snapshots. Holds no market state of its own: the caller keeps
/// whichever snapshot it last received and passes it back in on the next tick.
#[derive(Debug, Clone)]
pub struct LiveAssetStore {
    config: Arc<MarketConfig>,
}

impl LiveAssetStore {
    pub fn new(config: Arc<MarketConfig>) -> Self {
        Self { config }
    }

    /// One snapshot per catalog entry, in catalog order.
    ///
    /// Draw order per asset: price, market cap multiplier, volume, high band, low band.
    pub fn initial_snapshot<R: RandomSource + ?Sized>(&self, random: &mut R) -> Vec<AssetSnapshot> {
        let params = &self.config.simulation;
        self.config
            .catalog
            .entries()
            .iter()
            .map(|asset| {
                let current_price = fluctuate(asset.base_price, params.snapshot_volatility, random);
                let (change_24h, change_percent_24h) = change_against(asset.base_price, current_price);
                let market_cap = current_price
                    * uniform(MARKET_CAP_MULTIPLIER_MIN, MARKET_CAP_MULTIPLIER_MAX, random);
                let volume_24h = uniform(VOLUME_24H_MIN, VOLUME_24H_MAX, random);
                let high_24h = current_price * (1.0 + uniform(0.0, params.high_low_band, random));
                let low_24h = current_price * (1.0 - uniform(0.0, params.high_low_band, random));

                AssetSnapshot {
                    asset: asset.clone(),
                    current_price,
                    change_24h,
                    change_percent_24h,
                    market_cap,
                    volume_24h,
                    high_24h,
                    low_24h,
                }
            })
            .collect()
    }

    /// Advances every snapshot one step and returns a new collection; `previous` is untouched.
    ///
    /// The walk continues from the last price, but change figures are always measured against
    /// the catalog anchor. The high/low range only ever widens.
    pub fn tick<R: RandomSource + ?Sized>(
        &self,
        previous: &[AssetSnapshot],
        random: &mut R,
    ) -> Vec<AssetSnapshot> {
        let volatility = self.config.simulation.tick_volatility;
        previous
            .iter()
            .map(|snapshot| {
                let new_price = fluctuate(snapshot.current_price, volatility, random);
                let anchor = self
                    .config
                    .catalog
                    .base_price(snapshot.id())
                    .unwrap_or(snapshot.asset.base_price);
                let (change_24h, change_percent_24h) = change_against(anchor, new_price);

                AssetSnapshot {
                    asset: snapshot.asset.clone(),
                    current_price: new_price,
                    change_24h,
                    change_percent_24h,
                    market_cap: snapshot.market_cap,
                    volume_24h: snapshot.volume_24h,
                    high_24h: snapshot.high_24h.max(new_price),
                    low_24h: snapshot.low_24h.min(new_price),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::random_source::ScriptedRandomSource;

    fn store() -> LiveAssetStore {
        LiveAssetStore::new(Arc::new(MarketConfig::reference()))
    }

    #[test]
    fn initial_snapshot_follows_catalog_order_and_draw_order() {
        // price up 0.25%, cap multiplier at min, volume at min, high +2.5%, low -0%.
        let mut random = ScriptedRandomSource::new(vec![0.75, 0.0, 0.0, 0.5, 0.0]).unwrap();
        let snapshot = store().initial_snapshot(&mut random);

        assert_eq!(snapshot.len(), 10);
        assert_eq!(random.draws(), 50);
        let btc = &snapshot[0];
        assert_eq!(btc.id(), "btc");
        assert!((btc.current_price - 45_112.5).abs() < 1e-9);
        assert!((btc.change_24h - 112.5).abs() < 1e-9);
        assert!((btc.change_percent_24h - 0.25).abs() < 1e-9);
        assert!((btc.market_cap / (45_112.5 * 1e8) - 1.0).abs() < 1e-12);
        assert_eq!(btc.volume_24h, 1e9);
        assert!((btc.high_24h - 45_112.5 * 1.025).abs() < 1e-9);
        assert_eq!(btc.low_24h, btc.current_price);
        assert!(snapshot.iter().all(AssetSnapshot::is_within_range));
    }

    #[test]
    fn tick_measures_change_against_anchor_not_previous_price() {
        let store = store();
        let mut random = ScriptedRandomSource::constant(0.75).unwrap();
        let first = store.initial_snapshot(&mut random);
        let second = store.tick(&first, &mut random);
        let third = store.tick(&second, &mut random);

        let btc = &third[0];
        let expected_price = first[0].current_price * 1.0015 * 1.0015;
        assert!((btc.current_price - expected_price).abs() < 1e-6);
        assert!((btc.change_24h - (expected_price - 45_000.0)).abs() < 1e-6);
        assert!(
            (btc.change_percent_24h - (expected_price - 45_000.0) / 45_000.0 * 100.0).abs() < 1e-9
        );
    }

    #[test]
    fn tick_widens_range_and_keeps_input_intact() {
        let store = store();
        let mut random = ScriptedRandomSource::constant(0.5).unwrap();
        let before = store.initial_snapshot(&mut random);
        let copy = before.clone();

        let mut up = ScriptedRandomSource::constant(0.99).unwrap();
        let mut current = before.clone();
        for _ in 0..50 {
            current = store.tick(&current, &mut up);
        }

        assert_eq!(before, copy);
        for (old, new) in before.iter().zip(current.iter()) {
            assert!(new.high_24h >= old.high_24h);
            assert!(new.low_24h <= old.low_24h);
            assert!(new.is_within_range());
            assert_eq!(new.market_cap, old.market_cap);
            assert_eq!(new.volume_24h, old.volume_24h);
        }
    }
}
