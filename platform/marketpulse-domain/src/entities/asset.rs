use crate::value_objects::instrument_type::InstrumentType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStatic {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstrumentType,
    /// Anchor for every 24h change figure, however many ticks have elapsed.
    pub base_price: f64,
}

impl AssetStatic {
    pub fn new(id: &str, symbol: &str, name: &str, kind: InstrumentType, base_price: f64) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            kind,
            base_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    #[serde(flatten)]
    pub asset: AssetStatic,
    pub current_price: f64,
    pub change_24h: f64,
    pub change_percent_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
}

impl AssetSnapshot {
    pub fn id(&self) -> &str {
        &self.asset.id
    }

    pub fn is_within_range(&self) -> bool {
        self.low_24h <= self.current_price && self.current_price <= self.high_24h
    }
}

/// Absolute and percent change of `price` against `anchor`.
pub fn change_against(anchor: f64, price: f64) -> (f64, f64) {
    let change = price - anchor;
    (change, change / anchor * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_is_measured_against_anchor() {
        let (abs, pct) = change_against(200.0, 210.0);
        assert_eq!(abs, 10.0);
        assert!((pct - 5.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_serializes_flat_with_type_field() {
        let snap = AssetSnapshot {
            asset: AssetStatic::new("btc", "BTC", "Bitcoin", InstrumentType::Crypto, 45_000.0),
            current_price: 45_100.0,
            change_24h: 100.0,
            change_percent_24h: 0.2,
            market_cap: 1.0,
            volume_24h: 2.0,
            high_24h: 45_200.0,
            low_24h: 45_000.0,
        };
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["id"], "btc");
        assert_eq!(value["type"], "crypto");
        assert_eq!(value["current_price"], 45_100.0);
        assert!(snap.is_within_range());
    }
}
