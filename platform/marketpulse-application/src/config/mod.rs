use marketpulse_domain::entities::asset::AssetStatic;
use marketpulse_domain::entities::catalog::AssetCatalog;
use marketpulse_domain::entities::fx_rates::FxRateTable;
use marketpulse_domain::entities::market_config::{
    MarketConfig, SimulationParams, MAX_HISTORY_DAYS,
};
use marketpulse_domain::value_objects::currency::CurrencyCode;
use marketpulse_domain::value_objects::instrument_type::InstrumentType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Replaces the reference catalog when present.
    pub assets: Option<Vec<AssetConfig>>,
    /// Replaces the reference rate table when present.
    pub currencies: Option<Vec<CurrencyConfig>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    pub refresh_interval_secs: Option<u64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub snapshot_volatility: Option<f64>,
    pub tick_volatility: Option<f64>,
    pub history_volatility: Option<f64>,
    pub high_low_band: Option<f64>,
    pub history_days: Option<u32>,
    pub fallback_base_price: Option<f64>,
    /// Reject history requests for ids outside the catalog instead of using the fallback price.
    pub strict_assets: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    pub currency: Option<CurrencyCode>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstrumentType,
    pub base_price: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CurrencyConfig {
    pub code: CurrencyCode,
    pub rate: f64,
    pub symbol: String,
}

impl Config {
    pub fn refresh_interval(&self) -> Result<Duration, String> {
        let secs = self
            .feed
            .refresh_interval_secs
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
        if secs == 0 {
            return Err("feed.refresh_interval_secs must be > 0".to_string());
        }
        Ok(Duration::from_secs(secs))
    }

    pub fn display_currency(&self) -> CurrencyCode {
        self.display.currency.unwrap_or(CurrencyCode::PIVOT)
    }

    pub fn simulation_params(&self) -> Result<SimulationParams, String> {
        let defaults = SimulationParams::default();
        let sim = &self.simulation;
        let params = SimulationParams {
            snapshot_volatility: sim.snapshot_volatility.unwrap_or(defaults.snapshot_volatility),
            tick_volatility: sim.tick_volatility.unwrap_or(defaults.tick_volatility),
            history_volatility: sim.history_volatility.unwrap_or(defaults.history_volatility),
            high_low_band: sim.high_low_band.unwrap_or(defaults.high_low_band),
            history_days: sim.history_days.unwrap_or(defaults.history_days),
            fallback_base_price: if sim.strict_assets.unwrap_or(false) {
                None
            } else {
                sim.fallback_base_price.or(defaults.fallback_base_price)
            },
        };

        for (name, value) in [
            ("simulation.snapshot_volatility", params.snapshot_volatility),
            ("simulation.tick_volatility", params.tick_volatility),
            ("simulation.history_volatility", params.history_volatility),
        ] {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(format!("{name} must be in (0, 1) (got {value})"));
            }
        }
        if !params.high_low_band.is_finite() || !(0.0..1.0).contains(&params.high_low_band) {
            return Err(format!(
                "simulation.high_low_band must be in [0, 1) (got {})",
                params.high_low_band
            ));
        }
        if params.history_days > MAX_HISTORY_DAYS {
            return Err(format!(
                "simulation.history_days must be at most {MAX_HISTORY_DAYS} (got {})",
                params.history_days
            ));
        }
        if let Some(price) = params.fallback_base_price {
            if !price.is_finite() || price <= 0.0 {
                return Err(format!(
                    "simulation.fallback_base_price must be > 0 (got {price})"
                ));
            }
        }
        Ok(params)
    }

    /// Builds the immutable market definition every engine instance is constructed from.
    pub fn market_config(&self) -> Result<MarketConfig, String> {
        let catalog = match &self.assets {
            None => AssetCatalog::reference(),
            Some(assets) => AssetCatalog::new(
                assets
                    .iter()
                    .map(|a| AssetStatic::new(&a.id, &a.symbol, &a.name, a.kind, a.base_price))
                    .collect(),
            )
            .map_err(|err| format!("invalid [[assets]]: {err}"))?,
        };

        let fx_rates = match &self.currencies {
            None => FxRateTable::reference(),
            Some(currencies) => FxRateTable::new(
                currencies
                    .iter()
                    .map(|c| (c.code, c.rate, c.symbol.clone())),
            )
            .map_err(|err| format!("invalid [[currencies]]: {err}"))?,
        };

        let display = self.display_currency();
        if fx_rates.rate(display).is_err() {
            return Err(format!(
                "display.currency {display} is not listed in [[currencies]]"
            ));
        }

        Ok(MarketConfig {
            catalog,
            fx_rates,
            simulation: self.simulation_params()?,
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    Ok((config, contents))
}

/// Uses the file at `path` when given, otherwise the built-in reference market.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}

#[cfg(test)]
mod tests {
    use super::Config;
    use marketpulse_domain::value_objects::currency::CurrencyCode;
    use std::time::Duration;

    fn parse_config(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("config should parse")
    }

    #[test]
    fn empty_config_is_the_reference_market() {
        let config = parse_config("");
        let market = config.market_config().unwrap();
        assert_eq!(market.catalog.len(), 10);
        assert_eq!(market.fx_rates.rate(CurrencyCode::Inr).unwrap(), 83.12);
        assert_eq!(market.simulation.tick_volatility, 0.003);
        assert_eq!(market.simulation.fallback_base_price, Some(100.0));
        assert_eq!(config.refresh_interval().unwrap(), Duration::from_secs(30));
        assert_eq!(config.display_currency(), CurrencyCode::Usd);
    }

    #[test]
    fn parse_config_rejects_malformed_toml() {
        let err = toml::from_str::<Config>("[feed\nseed = 1").expect_err("malformed");
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let toml_str = r#"
[feed]
refresh_interval_secs = 5
jitter = true
"#;
        let err = toml::from_str::<Config>(toml_str).expect_err("unknown field should fail");
        assert!(err.to_string().to_lowercase().contains("unknown field"));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[feed]
refresh_interval_secs = 5
seed = 7

[simulation]
tick_volatility = 0.01
history_days = 3

[display]
currency = "EUR"

[[assets]]
id = "btc"
symbol = "BTC"
name = "Bitcoin"
type = "crypto"
base_price = 60000.0

[[assets]]
id = "aapl"
symbol = "AAPL"
name = "Apple Inc."
type = "stock"
base_price = 190.0

[[currencies]]
code = "USD"
rate = 1.0
symbol = "$"

[[currencies]]
code = "EUR"
rate = 0.9
symbol = "€"
"#;
        let config = parse_config(toml_str);
        let market = config.market_config().unwrap();
        assert_eq!(market.catalog.len(), 2);
        assert_eq!(market.catalog.base_price("btc"), Some(60_000.0));
        assert_eq!(market.fx_rates.rate(CurrencyCode::Eur).unwrap(), 0.9);
        assert!(market.fx_rates.rate(CurrencyCode::Inr).is_err());
        assert_eq!(market.simulation.tick_volatility, 0.01);
        assert_eq!(market.simulation.history_days, 3);
        assert_eq!(config.feed.seed, Some(7));
        assert_eq!(config.display_currency(), CurrencyCode::Eur);
    }

    #[test]
    fn strict_assets_disables_history_fallback() {
        let config = parse_config("[simulation]\nstrict_assets = true\nfallback_base_price = 50.0\n");
        assert_eq!(config.market_config().unwrap().simulation.fallback_base_price, None);
    }

    #[test]
    fn rejects_out_of_range_volatility() {
        let config = parse_config("[simulation]\ntick_volatility = 1.5\n");
        let err = config.market_config().unwrap_err();
        assert!(err.contains("simulation.tick_volatility"));
    }

    #[test]
    fn rejects_history_days_above_limit() {
        let config = parse_config("[simulation]\nhistory_days = 4294967295\n");
        let err = config.market_config().unwrap_err();
        assert!(err.contains("simulation.history_days"));
        assert!(err.contains("3650"));
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let config = parse_config("[feed]\nrefresh_interval_secs = 0\n");
        assert!(config.refresh_interval().is_err());
    }

    #[test]
    fn rejects_display_currency_missing_from_table() {
        let toml_str = r#"
[display]
currency = "INR"

[[currencies]]
code = "USD"
rate = 1.0
symbol = "$"
"#;
        let err = parse_config(toml_str).market_config().unwrap_err();
        assert!(err.contains("display.currency INR"));
    }

    #[test]
    fn rejects_duplicate_asset_ids() {
        let toml_str = r#"
[[assets]]
id = "btc"
symbol = "BTC"
name = "Bitcoin"
type = "crypto"
base_price = 1.0

[[assets]]
id = "btc"
symbol = "BTC"
name = "Bitcoin again"
type = "crypto"
base_price = 2.0
"#;
        let err = parse_config(toml_str).market_config().unwrap_err();
        assert!(err.contains("duplicate asset id"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = parse_config("[feed]\nseed = 3\n[display]\ncurrency = \"INR\"\n");
        let rendered = super::to_toml_pretty(&config).unwrap();
        let reparsed = parse_config(&rendered);
        assert_eq!(reparsed.feed.seed, Some(3));
        assert_eq!(reparsed.display_currency(), CurrencyCode::Inr);
    }
}
