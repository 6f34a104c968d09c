use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: f64,
    pub volume: f64,
}
