use crate::entities::fx_rates::FxRateTable;
use crate::errors::MarketError;
use crate::value_objects::currency::CurrencyCode;

const COMPACT_STEPS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Fixed-rate conversion and display formatting. Every operation fails with
/// `UnknownCurrency` for a code the rate table does not carry.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    rates: FxRateTable,
}

impl CurrencyConverter {
    pub fn new(rates: FxRateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &FxRateTable {
        &self.rates
    }

    /// Routes through USD: `amount / rate[from] * rate[to]`.
    pub fn convert(
        &self,
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<f64, MarketError> {
        let from_rate = self.rates.rate(from)?;
        let to_rate = self.rates.rate(to)?;
        Ok(amount / from_rate * to_rate)
    }

    pub fn symbol(&self, currency: CurrencyCode) -> Result<&str, MarketError> {
        self.rates.symbol(currency)
    }

    /// `$1,234.50`: symbol, en-US grouping, exactly two decimals.
    pub fn format(&self, amount: f64, currency: CurrencyCode) -> Result<String, MarketError> {
        let symbol = self.rates.symbol(currency)?;
        Ok(format!("{symbol}{}", group_thousands(amount)))
    }

    /// `$1.23T` / `B` / `M` / `K` for large values (inclusive thresholds), else `format`.
    pub fn format_compact(
        &self,
        amount: f64,
        currency: CurrencyCode,
    ) -> Result<String, MarketError> {
        let symbol = self.rates.symbol(currency)?;
        for (threshold, suffix) in COMPACT_STEPS {
            if amount >= threshold {
                return Ok(format!("{symbol}{}{suffix}", fixed_two(amount / threshold)));
            }
        }
        self.format(amount, currency)
    }
}

/// `+1.23%` for non-negative values, `-0.38%` otherwise.
pub fn format_signed_percent(percent: f64) -> String {
    let sign = if percent >= 0.0 { "+" } else { "" };
    format!("{sign}{}%", fixed_two(percent))
}

/// Bound on `value * 8` below which `value * 100` is exact in an `f64`.
const EXACT_TIE_LIMIT: f64 = 1e14;

/// Two fixed decimals, with exact ties (`1.125`) rounded away from zero.
///
/// `{:.2}` rounds exact ties to even. Only multiples of 1/8 can sit exactly on a tie, and
/// for those `x * 100` is exact, so `f64::round` settles them.
fn fixed_two(value: f64) -> String {
    let eighths = value * 8.0;
    let is_tie = eighths.is_finite()
        && eighths.abs() < EXACT_TIE_LIMIT
        && eighths.fract() == 0.0
        && eighths.abs() % 2.0 == 1.0;
    if !is_tie {
        return format!("{value:.2}");
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

fn group_thousands(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = fixed_two(amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if amount < 0.0 {
        grouped.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}
