use crate::errors::MarketError;
use crate::value_objects::currency::CurrencyCode;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FxRate {
    /// Units of this currency per one USD.
    pub rate: f64,
    pub symbol: String,
}

/// Fixed USD-pivot rate table. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FxRateTable {
    rates: BTreeMap<CurrencyCode, FxRate>,
}

impl FxRateTable {
    pub fn new(
        rates: impl IntoIterator<Item = (CurrencyCode, f64, String)>,
    ) -> Result<Self, MarketError> {
        let mut table = BTreeMap::new();
        for (code, rate, symbol) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(MarketError::InvalidRates(format!(
                    "rate for {code} must be a positive number (got {rate})"
                )));
            }
            if table.insert(code, FxRate { rate, symbol }).is_some() {
                return Err(MarketError::InvalidRates(format!("duplicate currency: {code}")));
            }
        }

        match table.get(&CurrencyCode::PIVOT) {
            Some(pivot) if pivot.rate == 1.0 => {}
            Some(pivot) => {
                return Err(MarketError::InvalidRates(format!(
                    "pivot currency {} must have rate 1 (got {})",
                    CurrencyCode::PIVOT,
                    pivot.rate
                )))
            }
            None => {
                return Err(MarketError::InvalidRates(format!(
                    "pivot currency {} is missing",
                    CurrencyCode::PIVOT
                )))
            }
        }

        Ok(Self { rates: table })
    }

    pub fn reference() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(CurrencyCode::Usd, FxRate { rate: 1.0, symbol: "$".to_string() });
        rates.insert(CurrencyCode::Eur, FxRate { rate: 0.92, symbol: "€".to_string() });
        rates.insert(CurrencyCode::Inr, FxRate { rate: 83.12, symbol: "₹".to_string() });
        Self { rates }
    }

    pub fn rate(&self, code: CurrencyCode) -> Result<f64, MarketError> {
        self.rates
            .get(&code)
            .map(|fx| fx.rate)
            .ok_or_else(|| MarketError::UnknownCurrency(code.to_string()))
    }

    pub fn symbol(&self, code: CurrencyCode) -> Result<&str, MarketError> {
        self.rates
            .get(&code)
            .map(|fx| fx.symbol.as_str())
            .ok_or_else(|| MarketError::UnknownCurrency(code.to_string()))
    }

    pub fn codes(&self) -> impl Iterator<Item = CurrencyCode> + '_ {
        self.rates.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rates_match_fixed_constants() {
        let table = FxRateTable::reference();
        assert_eq!(table.rate(CurrencyCode::Usd).unwrap(), 1.0);
        assert_eq!(table.rate(CurrencyCode::Eur).unwrap(), 0.92);
        assert_eq!(table.rate(CurrencyCode::Inr).unwrap(), 83.12);
        assert_eq!(table.symbol(CurrencyCode::Inr).unwrap(), "₹");
    }

    #[test]
    fn missing_code_is_unknown_currency() {
        let table = FxRateTable::new(vec![(CurrencyCode::Usd, 1.0, "$".to_string())]).unwrap();
        assert_eq!(
            table.rate(CurrencyCode::Eur).unwrap_err(),
            MarketError::UnknownCurrency("EUR".to_string())
        );
        assert!(table.symbol(CurrencyCode::Eur).is_err());
    }

    #[test]
    fn requires_pivot_at_rate_one() {
        assert!(FxRateTable::new(vec![(CurrencyCode::Eur, 0.92, "€".to_string())]).is_err());
        assert!(FxRateTable::new(vec![(CurrencyCode::Usd, 1.1, "$".to_string())]).is_err());
    }

    #[test]
    fn rejects_non_positive_rates() {
        let err = FxRateTable::new(vec![
            (CurrencyCode::Usd, 1.0, "$".to_string()),
            (CurrencyCode::Inr, -83.12, "₹".to_string()),
        ])
        .unwrap_err();
        assert!(matches!(err, MarketError::InvalidRates(_)));
    }
}
