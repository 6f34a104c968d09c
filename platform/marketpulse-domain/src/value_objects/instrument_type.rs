use crate::errors::MarketError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Crypto,
    Stock,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Crypto => "crypto",
            InstrumentType::Stock => "stock",
        }
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = MarketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "crypto" => Ok(InstrumentType::Crypto),
            "stock" => Ok(InstrumentType::Stock),
            other => Err(MarketError::InvalidCatalog(format!(
                "unsupported instrument type: {other}"
            ))),
        }
    }
}
