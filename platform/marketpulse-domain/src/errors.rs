#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    UnknownCurrency(String),
    UnknownAsset(String),
    InvalidCatalog(String),
    InvalidRates(String),
    InvalidHistoryDays(u32),
}

impl std::fmt::Display for MarketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketError::UnknownCurrency(code) => write!(f, "unknown currency: {code}"),
            MarketError::UnknownAsset(id) => write!(f, "unknown asset: {id}"),
            MarketError::InvalidCatalog(msg) => write!(f, "invalid catalog: {msg}"),
            MarketError::InvalidRates(msg) => write!(f, "invalid fx rates: {msg}"),
            MarketError::InvalidHistoryDays(days) => write!(
                f,
                "history days must be at most {} (got {days})",
                crate::entities::market_config::MAX_HISTORY_DAYS
            ),
        }
    }
}

impl std::error::Error for MarketError {}
