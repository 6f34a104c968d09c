use marketpulse_domain::entities::asset::AssetSnapshot;
use marketpulse_domain::errors::MarketError;
use marketpulse_domain::services::currency::{format_signed_percent, CurrencyConverter};
use marketpulse_domain::value_objects::currency::CurrencyCode;
use marketpulse_domain::value_objects::historical_point::HistoricalPoint;
use marketpulse_domain::value_objects::instrument_type::InstrumentType;
use serde::Serialize;

/// Hourly history is sampled down to one point per day for the chart panels.
pub const CHART_SAMPLE_STEP: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOverview {
    pub currency: CurrencyCode,
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub average_change_percent: f64,
    pub active_markets: usize,
    pub total_market_cap_display: String,
    pub total_volume_display: String,
    pub average_change_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstrumentType,
    pub price: String,
    pub change: String,
    pub market_cap: String,
    pub volume: String,
    pub positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub label: String,
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mover {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub change_percent: f64,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TopMovers {
    pub gainers: Vec<Mover>,
    pub losers: Vec<Mover>,
}

/// Headline cards: summed cap and volume (converted from USD) plus the mean 24h change.
pub fn market_overview(
    snapshot: &[AssetSnapshot],
    converter: &CurrencyConverter,
    currency: CurrencyCode,
) -> Result<MarketOverview, MarketError> {
    let total_cap_usd: f64 = snapshot.iter().map(|s| s.market_cap).sum();
    let total_volume_usd: f64 = snapshot.iter().map(|s| s.volume_24h).sum();
    let average_change_percent = if snapshot.is_empty() {
        0.0
    } else {
        snapshot.iter().map(|s| s.change_percent_24h).sum::<f64>() / snapshot.len() as f64
    };

    let total_market_cap = converter.convert(total_cap_usd, CurrencyCode::PIVOT, currency)?;
    let total_volume_24h = converter.convert(total_volume_usd, CurrencyCode::PIVOT, currency)?;

    Ok(MarketOverview {
        currency,
        total_market_cap,
        total_volume_24h,
        average_change_percent,
        active_markets: snapshot.len(),
        total_market_cap_display: converter.format_compact(total_market_cap, currency)?,
        total_volume_display: converter.format_compact(total_volume_24h, currency)?,
        average_change_display: format!("{} (24h)", format_signed_percent(average_change_percent)),
    })
}

pub fn market_rows(
    snapshot: &[AssetSnapshot],
    converter: &CurrencyConverter,
    currency: CurrencyCode,
) -> Result<Vec<MarketRow>, MarketError> {
    snapshot
        .iter()
        .map(|s| {
            let price = converter.convert(s.current_price, CurrencyCode::PIVOT, currency)?;
            let cap = converter.convert(s.market_cap, CurrencyCode::PIVOT, currency)?;
            let volume = converter.convert(s.volume_24h, CurrencyCode::PIVOT, currency)?;
            Ok(MarketRow {
                id: s.asset.id.clone(),
                symbol: s.asset.symbol.clone(),
                name: s.asset.name.clone(),
                kind: s.asset.kind,
                price: converter.format(price, currency)?,
                change: format_signed_percent(s.change_percent_24h),
                market_cap: converter.format_compact(cap, currency)?,
                volume: converter.format_compact(volume, currency)?,
                positive: s.change_percent_24h >= 0.0,
            })
        })
        .collect()
}

/// Every 24th hourly point, converted from USD, labelled like `Oct 18` (UTC).
pub fn daily_chart(
    history: &[HistoricalPoint],
    converter: &CurrencyConverter,
    currency: CurrencyCode,
) -> Result<Vec<ChartPoint>, MarketError> {
    history
        .iter()
        .step_by(CHART_SAMPLE_STEP)
        .map(|point| {
            Ok(ChartPoint {
                timestamp: point.timestamp,
                label: day_label(point.timestamp),
                price: converter.convert(point.price, CurrencyCode::PIVOT, currency)?,
                volume: converter.convert(point.volume, CurrencyCode::PIVOT, currency)?,
            })
        })
        .collect()
}

/// Up to `limit` strictly positive movers (largest first) and strictly negative movers
/// (most negative first).
pub fn top_movers(snapshot: &[AssetSnapshot], limit: usize) -> TopMovers {
    let mut ranked: Vec<&AssetSnapshot> = snapshot.iter().collect();
    ranked.sort_by(|a, b| b.change_percent_24h.total_cmp(&a.change_percent_24h));

    let gainers = ranked
        .iter()
        .filter(|s| s.change_percent_24h > 0.0)
        .take(limit)
        .map(|s| mover(s))
        .collect();
    let losers = ranked
        .iter()
        .rev()
        .filter(|s| s.change_percent_24h < 0.0)
        .take(limit)
        .map(|s| mover(s))
        .collect();

    TopMovers { gainers, losers }
}

fn mover(snapshot: &AssetSnapshot) -> Mover {
    Mover {
        id: snapshot.asset.id.clone(),
        symbol: snapshot.asset.symbol.clone(),
        name: snapshot.asset.name.clone(),
        change_percent: snapshot.change_percent_24h,
        change: format_signed_percent(snapshot.change_percent_24h),
    }
}

fn day_label(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
