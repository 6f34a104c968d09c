use clap::{Parser, ValueEnum};
use marketpulse::bootstrap;
use marketpulse::headless::{HeadlessArgs, HeadlessMode};
use marketpulse::logging::{LogMakeWriter, LogStore, SharedLogStore};
use marketpulse::TuiOpts;
use std::net::SocketAddr;
use std::path::PathBuf;

const LOG_ENV: &str = "MARKETPULSE_LOG";
const METRICS_ADDR_ENV: &str = "MARKETPULSE_METRICS_ADDR";
const LOG_STORE_CAPACITY: usize = 2000;

#[derive(Parser, Debug)]
#[command(name = "marketpulse")]
#[command(about = "Simulated crypto and stock market dashboard with a headless JSON runner.", version)]
struct Cli {
    /// Run without TUI, print one JSON document and exit.
    #[arg(long)]
    headless: bool,

    /// Headless mode: snapshot | tick | history | convert | overview
    #[arg(long)]
    mode: Option<Mode>,

    /// Config file path (TOML). If omitted, uses env MARKETPULSE_CONFIG, then built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset id (history mode only).
    #[arg(long)]
    asset: Option<String>,

    /// Days of hourly history (history mode only).
    #[arg(long)]
    days: Option<u32>,

    /// Number of ticks to advance the initial snapshot (tick mode only).
    #[arg(long)]
    ticks: Option<u32>,

    /// Display currency (USD, EUR, INR). Defaults to [display] currency.
    #[arg(long)]
    currency: Option<String>,

    /// Amount to convert (convert mode only).
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<f64>,

    /// Source currency (convert mode only, default USD).
    #[arg(long)]
    from: Option<String>,

    /// Target currency (convert mode only, default the display currency).
    #[arg(long)]
    to: Option<String>,

    /// Seed for the random walk. Overrides [feed] seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Snapshot,
    Tick,
    History,
    Convert,
    Overview,
}

fn main() {
    let cli = Cli::parse();

    // Headless output owns stdout, so its logs go to stderr; the TUI keeps them in memory.
    let log_store = (!cli.headless).then(|| LogStore::shared(LOG_STORE_CAPACITY));
    if let Err(err) = init_tracing(log_store.clone()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let config_path = bootstrap::resolve_config_path(cli.config);

    if cli.headless {
        let Some(mode) = cli.mode else {
            eprintln!("error: --mode is required with --headless");
            std::process::exit(1);
        };
        let mode = match mode {
            Mode::Snapshot => HeadlessMode::Snapshot,
            Mode::Tick => HeadlessMode::Tick,
            Mode::History => HeadlessMode::History,
            Mode::Convert => HeadlessMode::Convert,
            Mode::Overview => HeadlessMode::Overview,
        };

        let result = marketpulse::headless::run_headless(
            mode,
            HeadlessArgs {
                config_path,
                asset: cli.asset,
                days: cli.days,
                ticks: cli.ticks,
                currency: cli.currency,
                amount: cli.amount,
                from: cli.from,
                to: cli.to,
                seed: cli.seed,
            },
        );

        match result {
            Ok(json) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json)
                        .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
                );
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    let Some(log_store) = log_store else {
        eprintln!("error: log store missing for TUI mode");
        std::process::exit(1);
    };
    let opts = TuiOpts {
        config_path,
        currency: cli.currency,
        seed: cli.seed,
        log_store,
    };

    if let Err(err) = marketpulse::run(opts) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(log_store: Option<SharedLogStore>) -> Result<(), String> {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match log_store {
        Some(store) => builder
            .with_ansi(false)
            .with_writer(LogMakeWriter::new(store))
            .init(),
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = std::env::var(METRICS_ADDR_ENV).ok() else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid {METRICS_ADDR_ENV} (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics() -> Result<Option<SocketAddr>, String> {
    let _ = METRICS_ADDR_ENV;
    Ok(None)
}
