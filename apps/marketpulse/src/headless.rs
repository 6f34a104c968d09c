use crate::bootstrap::{self, EngineStream};
use marketpulse_application::dashboard;
use marketpulse_domain::value_objects::currency::CurrencyCode;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_TOP_MOVERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessMode {
    Snapshot,
    Tick,
    History,
    Convert,
    Overview,
}

impl HeadlessMode {
    fn as_str(&self) -> &'static str {
        match self {
            HeadlessMode::Snapshot => "snapshot",
            HeadlessMode::Tick => "tick",
            HeadlessMode::History => "history",
            HeadlessMode::Convert => "convert",
            HeadlessMode::Overview => "overview",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessArgs {
    pub config_path: Option<PathBuf>,
    pub asset: Option<String>,
    pub days: Option<u32>,
    pub ticks: Option<u32>,
    pub currency: Option<String>,
    pub amount: Option<f64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub seed: Option<u64>,
}

pub fn run_headless(mode: HeadlessMode, args: HeadlessArgs) -> Result<serde_json::Value, String> {
    let runtime = bootstrap::load_runtime(args.config_path.clone())?;
    let seed = runtime.seed(args.seed);
    let mut engine = runtime.engine(seed, EngineStream::Headless);
    let currency = match args.currency.as_deref() {
        Some(raw) => parse_currency("--currency", raw)?,
        None => runtime.config.display_currency(),
    };
    tracing::info!(mode = mode.as_str(), %currency, seed = ?seed, "headless run");

    match mode {
        HeadlessMode::Snapshot => {
            let snapshot = engine.initial_snapshot();
            let rows = dashboard::market_rows(&snapshot, engine.converter(), currency)
                .map_err(|err| format!("snapshot failed: {err}"))?;
            Ok(serde_json::json!({
                "status": "ok",
                "mode": "snapshot",
                "currency": currency,
                "assets": snapshot,
                "rows": rows,
            }))
        }
        HeadlessMode::Tick => {
            let ticks = args.ticks.unwrap_or(1);
            let mut snapshot = engine.initial_snapshot();
            for _ in 0..ticks {
                snapshot = engine.tick(&snapshot);
            }
            let rows = dashboard::market_rows(&snapshot, engine.converter(), currency)
                .map_err(|err| format!("tick failed: {err}"))?;
            Ok(serde_json::json!({
                "status": "ok",
                "mode": "tick",
                "ticks": ticks,
                "currency": currency,
                "assets": snapshot,
                "rows": rows,
            }))
        }
        HeadlessMode::History => {
            let asset = args
                .asset
                .as_deref()
                .ok_or_else(|| "--asset is required for history mode".to_string())?;
            let points = engine
                .historical_series(asset, args.days)
                .map_err(|err| format!("history failed: {err}"))?;
            let chart = dashboard::daily_chart(&points, engine.converter(), currency)
                .map_err(|err| format!("history failed: {err}"))?;
            Ok(serde_json::json!({
                "status": "ok",
                "mode": "history",
                "asset": asset,
                "currency": currency,
                "points": points,
                "chart": chart,
            }))
        }
        HeadlessMode::Convert => {
            let amount = args
                .amount
                .ok_or_else(|| "--amount is required for convert mode".to_string())?;
            let from = match args.from.as_deref() {
                Some(raw) => parse_currency("--from", raw)?,
                None => CurrencyCode::PIVOT,
            };
            let to = match args.to.as_deref() {
                Some(raw) => parse_currency("--to", raw)?,
                None => currency,
            };
            let converted = engine
                .convert(amount, from, to)
                .map_err(|err| format!("convert failed: {err}"))?;
            Ok(serde_json::json!({
                "status": "ok",
                "mode": "convert",
                "amount": amount,
                "from": from,
                "to": to,
                "result": converted,
                "formatted": engine.format(converted, to).map_err(|err| format!("convert failed: {err}"))?,
                "compact": engine.format_compact(converted, to).map_err(|err| format!("convert failed: {err}"))?,
            }))
        }
        HeadlessMode::Overview => {
            let snapshot = engine.initial_snapshot();
            let overview = dashboard::market_overview(&snapshot, engine.converter(), currency)
                .map_err(|err| format!("overview failed: {err}"))?;
            let movers = dashboard::top_movers(&snapshot, DEFAULT_TOP_MOVERS);
            Ok(serde_json::json!({
                "status": "ok",
                "mode": "overview",
                "overview": overview,
                "top_movers": movers,
            }))
        }
    }
}

fn parse_currency(flag: &str, raw: &str) -> Result<CurrencyCode, String> {
    CurrencyCode::from_str(raw).map_err(|err| format!("invalid {flag}: {err}"))
}
