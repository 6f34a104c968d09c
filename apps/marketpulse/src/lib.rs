mod app;
pub mod bootstrap;
pub mod headless;
pub mod logging;
mod tasks;
mod ui;

use crate::app::App;
use crate::bootstrap::EngineStream;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use marketpulse_application::engine::MarketEngine;
use marketpulse_application::feed::spawn_feed;
use marketpulse_domain::value_objects::currency::CurrencyCode;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const REDRAW_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Clone)]
pub struct TuiOpts {
    pub config_path: Option<PathBuf>,
    pub currency: Option<String>,
    pub seed: Option<u64>,
    pub log_store: logging::SharedLogStore,
}

struct Session {
    feed_engine: MarketEngine,
    chart_engine: MarketEngine,
    refresh_interval: Duration,
    currency: CurrencyCode,
    log_store: logging::SharedLogStore,
}

pub fn run(opts: TuiOpts) -> Result<(), String> {
    let session = prepare_session(opts)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|err| format!("failed to init tokio runtime: {err}"))?;
    runtime.block_on(run_async(session))
}

/// Config problems are reported before the terminal switches to raw mode.
fn prepare_session(opts: TuiOpts) -> Result<Session, String> {
    let runtime = bootstrap::load_runtime(opts.config_path)?;
    let refresh_interval = runtime.config.refresh_interval()?;
    let currency = match opts.currency.as_deref() {
        Some(raw) => {
            CurrencyCode::from_str(raw).map_err(|err| format!("invalid --currency: {err}"))?
        }
        None => runtime.config.display_currency(),
    };
    runtime
        .market
        .fx_rates
        .rate(currency)
        .map_err(|err| format!("invalid --currency: {err}"))?;

    let seed = runtime.seed(opts.seed);
    Ok(Session {
        feed_engine: runtime.engine(seed, EngineStream::Feed),
        chart_engine: runtime.engine(seed, EngineStream::Chart),
        refresh_interval,
        currency,
        log_store: opts.log_store,
    })
}

async fn run_async(session: Session) -> Result<(), String> {
    enable_raw_mode().map_err(|err| format!("failed to enable raw mode: {err}"))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|err| format!("failed to enter alternate screen: {err}"))?;
    stdout
        .execute(crossterm::terminal::Clear(
            crossterm::terminal::ClearType::All,
        ))
        .map_err(|err| format!("failed to clear screen: {err}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|err| format!("failed to init terminal: {err}"))?;
    terminal
        .hide_cursor()
        .map_err(|err| format!("failed to hide cursor: {err}"))?;

    let result = run_loop(&mut terminal, session).await;

    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    let _ = disable_raw_mode();
    let _ = terminal.show_cursor();

    result
}

async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    session: Session,
) -> Result<(), String> {
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let feed = spawn_feed(session.feed_engine, session.refresh_interval, "dashboard")?;
    let forwarder = tasks::forward_feed(feed.subscribe(), event_tx.clone());

    let mut app = App::new(
        session.chart_engine,
        feed.latest(),
        session.currency,
        session.log_store,
        session.refresh_interval,
    );
    tasks::spawn_input_reader(event_tx);

    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    let result = loop {
        if app.dirty {
            if let Err(err) = terminal.draw(|frame| ui::draw(frame, &app)) {
                break Err(format!("terminal draw failed: {err}"));
            }
            app.dirty = false;
        }

        tokio::select! {
            _ = redraw.tick() => {
                app.on_tick();
            }
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else { break Ok(()); };
                match app.on_event(event) {
                    Ok(true) => break Ok(()),
                    Ok(false) => {}
                    Err(err) => break Err(err),
                }
            }
        }
    };

    forwarder.abort();
    feed.stop();
    result
}
