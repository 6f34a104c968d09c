use marketpulse_application::config::{self, Config};
use marketpulse_application::engine::MarketEngine;
use marketpulse_domain::entities::market_config::MarketConfig;
use marketpulse_infrastructure::clock::SystemClock;
use marketpulse_infrastructure::random::StdRandomSource;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

pub const CONFIG_ENV: &str = "MARKETPULSE_CONFIG";

/// Random streams handed to the engines of one process. With a fixed seed every stream is
/// still reproducible, and two consumers never replay each other's walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStream {
    Feed = 0,
    Chart = 1,
    Headless = 2,
}

pub struct Runtime {
    pub config: Config,
    pub market: Arc<MarketConfig>,
}

impl Runtime {
    /// The CLI seed wins over `[feed] seed`.
    pub fn seed(&self, cli_seed: Option<u64>) -> Option<u64> {
        cli_seed.or(self.config.feed.seed)
    }

    pub fn engine(&self, seed: Option<u64>, stream: EngineStream) -> MarketEngine {
        let random = StdRandomSource::from_optional_seed(seed.map(|s| s.wrapping_add(stream as u64)));
        MarketEngine::new(self.market.clone(), Box::new(random), Arc::new(SystemClock))
    }
}

/// `--config` first, then `MARKETPULSE_CONFIG`; blank values count as unset.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_path.or_else(|| {
        env::var(CONFIG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
}

pub fn load_runtime(config_path: Option<PathBuf>) -> Result<Runtime, String> {
    let config = config::load_or_default(config_path.as_deref())?;
    let market = config.market_config()?;
    tracing::info!(
        config = %config_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".to_string()),
        assets = market.catalog.len(),
        "market configuration loaded"
    );
    Ok(Runtime {
        config,
        market: Arc::new(market),
    })
}
