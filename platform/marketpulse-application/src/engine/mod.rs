use marketpulse_domain::entities::asset::{AssetSnapshot, AssetStatic};
use marketpulse_domain::entities::market_config::MarketConfig;
use marketpulse_domain::errors::MarketError;
use marketpulse_domain::repositories::clock::Clock;
use marketpulse_domain::repositories::random_source::RandomSource;
use marketpulse_domain::services::currency::CurrencyConverter;
use marketpulse_domain::services::history::HistoricalSeriesGenerator;
use marketpulse_domain::services::live_store::LiveAssetStore;
use marketpulse_domain::value_objects::currency::CurrencyCode;
use marketpulse_domain::value_objects::historical_point::HistoricalPoint;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn};

pub type BoxedRandom = Box<dyn RandomSource + Send>;
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// One simulated market: the seven operations the presentation layer calls.
///
/// Each engine owns its random source, so two engines built from the same config evolve
/// independently.
pub struct MarketEngine {
    config: Arc<MarketConfig>,
    store: LiveAssetStore,
    history: HistoricalSeriesGenerator,
    converter: CurrencyConverter,
    random: BoxedRandom,
    clock: SharedClock,
}

impl MarketEngine {
    pub fn new(config: Arc<MarketConfig>, random: BoxedRandom, clock: SharedClock) -> Self {
        Self {
            store: LiveAssetStore::new(config.clone()),
            history: HistoricalSeriesGenerator::new(config.clone()),
            converter: CurrencyConverter::new(config.fx_rates.clone()),
            config,
            random,
            clock,
        }
    }

    pub fn config(&self) -> &Arc<MarketConfig> {
        &self.config
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    pub fn catalog(&self) -> &[AssetStatic] {
        self.config.catalog.entries()
    }

    pub fn initial_snapshot(&mut self) -> Vec<AssetSnapshot> {
        let _span = info_span!("initial_snapshot", assets = self.config.catalog.len()).entered();
        self.store.initial_snapshot(self.random.as_mut())
    }

    pub fn tick(&mut self, previous: &[AssetSnapshot]) -> Vec<AssetSnapshot> {
        let started = Instant::now();
        let next = self.store.tick(previous, self.random.as_mut());
        metrics::histogram!("marketpulse.engine.tick_ms")
            .record(started.elapsed().as_secs_f64() * 1000.0);
        debug!(assets = next.len(), "advanced snapshot");
        next
    }

    pub fn historical_series(
        &mut self,
        asset_id: &str,
        days: Option<u32>,
    ) -> Result<Vec<HistoricalPoint>, MarketError> {
        let _span = info_span!("historical_series", asset_id = %asset_id).entered();
        if self.config.catalog.get(asset_id).is_none() {
            if let Some(fallback) = self.config.simulation.fallback_base_price {
                warn!(asset_id = %asset_id, fallback, "unknown asset id, using fallback base price");
            }
        }
        let points =
            self.history
                .generate(asset_id, days, self.random.as_mut(), self.clock.as_ref())?;
        metrics::counter!("marketpulse.history.points").increment(points.len() as u64);
        Ok(points)
    }

    pub fn convert(
        &self,
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<f64, MarketError> {
        self.converter.convert(amount, from, to)
    }

    pub fn format(&self, amount: f64, currency: CurrencyCode) -> Result<String, MarketError> {
        self.converter.format(amount, currency)
    }

    pub fn format_compact(
        &self,
        amount: f64,
        currency: CurrencyCode,
    ) -> Result<String, MarketError> {
        self.converter.format_compact(amount, currency)
    }
}
