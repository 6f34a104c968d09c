use crate::logging::SharedLogStore;
use crate::tasks::TaskEvent;
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use marketpulse_application::dashboard::{self, ChartPoint, MarketOverview, MarketRow, TopMovers};
use marketpulse_application::engine::MarketEngine;
use marketpulse_application::feed::SharedSnapshot;
use marketpulse_domain::entities::asset::AssetSnapshot;
use marketpulse_domain::errors::MarketError;
use marketpulse_domain::value_objects::currency::CurrencyCode;
use marketpulse_domain::value_objects::historical_point::HistoricalPoint;
use std::time::Duration;

pub const TOP_MOVERS: usize = 3;

pub struct App {
    pub currency: CurrencyCode,
    pub snapshot: SharedSnapshot,
    pub selected: usize,
    pub overview: Option<MarketOverview>,
    pub rows: Vec<MarketRow>,
    pub chart: Vec<ChartPoint>,
    pub movers: TopMovers,
    pub ticks_seen: u64,
    pub refresh_interval: Duration,
    pub history_days: u32,
    pub last_error: Option<String>,
    pub log_store: SharedLogStore,
    pub dirty: bool,
    history: Vec<HistoricalPoint>,
    chart_engine: MarketEngine,
    logs_seen: u64,
}

impl App {
    /// `chart_engine` only serves history and formatting; live prices come from the feed.
    pub fn new(
        chart_engine: MarketEngine,
        snapshot: SharedSnapshot,
        currency: CurrencyCode,
        log_store: SharedLogStore,
        refresh_interval: Duration,
    ) -> Self {
        let history_days = chart_engine.config().simulation.history_days;
        let mut app = Self {
            currency,
            snapshot,
            selected: 0,
            overview: None,
            rows: Vec::new(),
            chart: Vec::new(),
            movers: TopMovers::default(),
            ticks_seen: 0,
            refresh_interval,
            history_days,
            last_error: None,
            log_store,
            dirty: true,
            history: Vec::new(),
            chart_engine,
            logs_seen: 0,
        };
        app.reload_history();
        app.rebuild_views();
        app
    }

    pub fn selected_asset(&self) -> Option<&AssetSnapshot> {
        self.snapshot.get(self.selected)
    }

    pub fn on_tick(&mut self) {
        let written = self.log_store.lock().written();
        if written != self.logs_seen {
            self.logs_seen = written;
            self.dirty = true;
        }
    }

    pub fn on_event(&mut self, event: TaskEvent) -> Result<bool, String> {
        match event {
            TaskEvent::Input(ct) => self.on_input(ct),
            TaskEvent::Snapshot(snapshot) => {
                self.snapshot = snapshot;
                self.ticks_seen = self.ticks_seen.saturating_add(1);
                if self.selected >= self.snapshot.len() {
                    self.selected = self.snapshot.len().saturating_sub(1);
                }
                self.reload_history();
                self.rebuild_views();
                Ok(false)
            }
        }
    }

    fn on_input(&mut self, event: CtEvent) -> Result<bool, String> {
        match event {
            CtEvent::Key(key) if key.kind != KeyEventKind::Release => self.on_key(key),
            CtEvent::Resize(_, _) => {
                self.dirty = true;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('c') => {
                self.currency = self.next_currency();
                tracing::info!(currency = %self.currency, "display currency changed");
                self.rebuild_views();
            }
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected.saturating_add(1)),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(usize::MAX),
            _ => {}
        }
        Ok(false)
    }

    fn select(&mut self, index: usize) {
        let index = index.min(self.snapshot.len().saturating_sub(1));
        if index == self.selected {
            return;
        }
        self.selected = index;
        self.reload_history();
        self.rebuild_views();
    }

    /// Skips codes that the configured rate table does not list.
    fn next_currency(&self) -> CurrencyCode {
        let rates = self.chart_engine.converter().rates();
        let mut candidate = self.currency.next();
        for _ in 0..CurrencyCode::ALL.len() {
            if rates.rate(candidate).is_ok() {
                return candidate;
            }
            candidate = candidate.next();
        }
        self.currency
    }

    fn reload_history(&mut self) {
        let Some(id) = self.selected_asset().map(|s| s.asset.id.clone()) else {
            self.history.clear();
            return;
        };
        match self.chart_engine.historical_series(&id, None) {
            Ok(points) => self.history = points,
            Err(err) => {
                tracing::warn!(asset_id = %id, error = %err, "history unavailable");
                self.history.clear();
            }
        }
    }

    fn rebuild_views(&mut self) {
        match self.compute_views() {
            Ok(()) => self.last_error = None,
            Err(err) => {
                tracing::warn!(error = %err, "dashboard refresh failed");
                self.last_error = Some(err.to_string());
            }
        }
        self.dirty = true;
    }

    fn compute_views(&mut self) -> Result<(), MarketError> {
        let converter = self.chart_engine.converter();
        let overview = dashboard::market_overview(&self.snapshot, converter, self.currency)?;
        let rows = dashboard::market_rows(&self.snapshot, converter, self.currency)?;
        let chart = dashboard::daily_chart(&self.history, converter, self.currency)?;
        self.overview = Some(overview);
        self.rows = rows;
        self.chart = chart;
        self.movers = dashboard::top_movers(&self.snapshot, TOP_MOVERS);
        Ok(())
    }
}
