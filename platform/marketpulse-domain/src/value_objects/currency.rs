use crate::errors::MarketError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISO-style currency code. USD is the pivot every conversion routes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyCode {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "INR")]
    Inr,
}

impl CurrencyCode {
    pub const PIVOT: CurrencyCode = CurrencyCode::Usd;
    pub const ALL: [CurrencyCode; 3] = [CurrencyCode::Usd, CurrencyCode::Eur, CurrencyCode::Inr];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Inr => "INR",
        }
    }

    /// Next code in `ALL`, wrapping around. Used by the dashboard currency toggle.
    pub fn next(&self) -> CurrencyCode {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = MarketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "USD" => Ok(CurrencyCode::Usd),
            "EUR" => Ok(CurrencyCode::Eur),
            "INR" => Ok(CurrencyCode::Inr),
            _ => Err(MarketError::UnknownCurrency(value.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" Eur ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
        assert_eq!("INR".parse::<CurrencyCode>().unwrap(), CurrencyCode::Inr);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "GBP".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err, MarketError::UnknownCurrency("GBP".to_string()));
    }

    #[test]
    fn next_cycles_through_all_codes() {
        assert_eq!(CurrencyCode::Usd.next(), CurrencyCode::Eur);
        assert_eq!(CurrencyCode::Eur.next(), CurrencyCode::Inr);
        assert_eq!(CurrencyCode::Inr.next(), CurrencyCode::Usd);
    }

    #[test]
    fn serializes_as_upper_case_code() {
        let json = serde_json::to_string(&CurrencyCode::Inr).unwrap();
        assert_eq!(json, "\"INR\"");
    }
}
