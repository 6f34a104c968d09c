use crate::entities::asset::AssetStatic;
use crate::errors::MarketError;
use crate::value_objects::instrument_type::InstrumentType;
use std::collections::HashSet;

/// Ordered, immutable list of tradable instruments.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    entries: Vec<AssetStatic>,
}

impl AssetCatalog {
    pub fn new(entries: Vec<AssetStatic>) -> Result<Self, MarketError> {
        if entries.is_empty() {
            return Err(MarketError::InvalidCatalog(
                "catalog must contain at least one asset".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(MarketError::InvalidCatalog("asset id must not be empty".to_string()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(MarketError::InvalidCatalog(format!(
                    "duplicate asset id: {}",
                    entry.id
                )));
            }
            if !entry.base_price.is_finite() || entry.base_price <= 0.0 {
                return Err(MarketError::InvalidCatalog(format!(
                    "base_price for {} must be a positive number (got {})",
                    entry.id, entry.base_price
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The ten-instrument reference market.
    pub fn reference() -> Self {
        use InstrumentType::{Crypto, Stock};
        Self {
            entries: vec![
                AssetStatic::new("btc", "BTC", "Bitcoin", Crypto, 45_000.0),
                AssetStatic::new("eth", "ETH", "Ethereum", Crypto, 2_400.0),
                AssetStatic::new("bnb", "BNB", "Binance Coin", Crypto, 320.0),
                AssetStatic::new("sol", "SOL", "Solana", Crypto, 98.0),
                AssetStatic::new("xrp", "XRP", "Ripple", Crypto, 0.62),
                AssetStatic::new("aapl", "AAPL", "Apple Inc.", Stock, 182.0),
                AssetStatic::new("msft", "MSFT", "Microsoft", Stock, 378.0),
                AssetStatic::new("googl", "GOOGL", "Alphabet", Stock, 142.0),
                AssetStatic::new("tsla", "TSLA", "Tesla", Stock, 248.0),
                AssetStatic::new("nvda", "NVDA", "NVIDIA", Stock, 495.0),
            ],
        }
    }

    pub fn entries(&self) -> &[AssetStatic] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&AssetStatic> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn base_price(&self, id: &str) -> Option<f64> {
        self.get(id).map(|entry| entry.base_price)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
