use crate::entities::market_config::{MarketConfig, MAX_HISTORY_DAYS};
use crate::errors::MarketError;
use crate::repositories::clock::Clock;
use crate::repositories::random_source::RandomSource;
use crate::services::random_walk::{fluctuate, uniform};
use crate::value_objects::historical_point::HistoricalPoint;
use std::sync::Arc;

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const HISTORY_VOLUME_MIN: f64 = 5e8;
pub const HISTORY_VOLUME_MAX: f64 = 1.5e9;

/// Hourly random-walk history for one instrument, ending at the clock's "now".
#[derive(Debug, Clone)]
pub struct HistoricalSeriesGenerator {
    config: Arc<MarketConfig>,
}

impl HistoricalSeriesGenerator {
    pub fn new(config: Arc<MarketConfig>) -> Self {
        Self { config }
    }

    pub fn resolve_base_price(&self, asset_id: &str) -> Result<f64, MarketError> {
        self.config
            .catalog
            .base_price(asset_id)
            .or(self.config.simulation.fallback_base_price)
            .ok_or_else(|| MarketError::UnknownAsset(asset_id.to_string()))
    }

    /// Produces `days * 24 + 1` points spaced one hour apart, oldest first.
    /// `days` above `MAX_HISTORY_DAYS` is rejected before anything is allocated.
    ///
    /// Each point draws its price (walking from the previous point) before its volume.
    /// Nothing is persisted between calls, so every call yields a fresh path.
    pub fn generate<R, C>(
        &self,
        asset_id: &str,
        days: Option<u32>,
        random: &mut R,
        clock: &C,
    ) -> Result<Vec<HistoricalPoint>, MarketError>
    where
        R: RandomSource + ?Sized,
        C: Clock + ?Sized,
    {
        let days = days.unwrap_or(self.config.simulation.history_days);
        if days > MAX_HISTORY_DAYS {
            return Err(MarketError::InvalidHistoryDays(days));
        }
        let base_price = self.resolve_base_price(asset_id)?;
        let volatility = self.config.simulation.history_volatility;
        let hours = i64::from(days) * 24;
        let now = clock.now_millis();

        let mut points = Vec::with_capacity(hours as usize + 1);
        let mut price = base_price;
        for i in (0..=hours).rev() {
            price = fluctuate(price, volatility, random);
            let volume = uniform(HISTORY_VOLUME_MIN, HISTORY_VOLUME_MAX, random);
            points.push(HistoricalPoint {
                timestamp: now - i * HOUR_MS,
                price,
                volume,
            });
        }

        Ok(points)
    }
}
