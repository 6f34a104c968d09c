use crate::entities::catalog::AssetCatalog;
use crate::entities::fx_rates::FxRateTable;

/// Upper bound on a history request (ten years of hourly points).
pub const MAX_HISTORY_DAYS: u32 = 3_650;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub snapshot_volatility: f64,
    pub tick_volatility: f64,
    pub history_volatility: f64,
    /// Max relative distance of the initial high/low band from the opening price.
    pub high_low_band: f64,
    pub history_days: u32,
    /// Base price assumed for history requests on ids outside the catalog.
    /// `None` turns such requests into `UnknownAsset` errors.
    pub fallback_base_price: Option<f64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            snapshot_volatility: 0.005,
            tick_volatility: 0.003,
            history_volatility: 0.01,
            high_low_band: 0.05,
            history_days: 7,
            fallback_base_price: Some(100.0),
        }
    }
}

/// Everything a simulated market needs, passed explicitly into each service.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    pub catalog: AssetCatalog,
    pub fx_rates: FxRateTable,
    pub simulation: SimulationParams,
}

impl MarketConfig {
    pub fn reference() -> Self {
        Self {
            catalog: AssetCatalog::reference(),
            fx_rates: FxRateTable::reference(),
            simulation: SimulationParams::default(),
        }
    }
}
