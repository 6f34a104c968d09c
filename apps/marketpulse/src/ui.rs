use crate::app::App;
use marketpulse_application::dashboard::Mover;
use marketpulse_domain::value_objects::currency::CurrencyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Sparkline, Table,
    TableState, Wrap,
};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(12),
                Constraint::Length(7),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)].as_ref())
        .split(outer[1]);

    draw_stats(frame, outer[0], app);
    draw_market_table(frame, body[0], app);
    draw_asset_panel(frame, body[1], app);
    draw_logs(frame, outer[2], app);
    draw_help(frame, outer[3], app);
}

fn change_style(positive: bool) -> Style {
    if positive {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn draw_stats(frame: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);

    let Some(overview) = app.overview.as_ref() else {
        frame.render_widget(
            Paragraph::new("no market data").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let change_positive = overview.average_change_percent >= 0.0;
    let selected_price = app
        .selected_asset()
        .and_then(|s| app.rows.iter().find(|row| row.id == s.asset.id))
        .map(|row| (format!("{} Price", row.symbol), row.price.clone(), row.change.clone(), row.positive));

    let mut entries = vec![
        (
            "Total Market Cap".to_string(),
            overview.total_market_cap_display.clone(),
            overview.average_change_display.clone(),
            change_positive,
        ),
        (
            "24h Trading Volume".to_string(),
            overview.total_volume_display.clone(),
            format!("in {}", overview.currency),
            true,
        ),
        (
            "Active Markets".to_string(),
            overview.active_markets.to_string(),
            format!("refresh every {}s", app.refresh_interval.as_secs()),
            true,
        ),
    ];
    if let Some(entry) = selected_price {
        entries.push(entry);
    }

    for (idx, (title, value, detail, positive)) in entries.into_iter().enumerate() {
        let lines = vec![
            Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(detail, change_style(positive))),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
            cards[idx],
        );
    }
}

fn draw_market_table(frame: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["Asset", "Type", "Price", "24h", "Market Cap", "Volume"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(format!("{} {}", row.symbol, row.name)),
                Cell::from(row.kind.as_str()),
                Cell::from(row.price.clone()),
                Cell::from(Span::styled(row.change.clone(), change_style(row.positive))),
                Cell::from(row.market_cap.clone()),
                Cell::from(row.volume.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(11),
    ];

    let title = format!("Markets ({}) · tick #{}", app.currency, app.ticks_seen);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_asset_panel(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(55),
                Constraint::Percentage(20),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(area);

    let name = app
        .selected_asset()
        .map(|s| format!("{} ({})", s.asset.name, s.asset.symbol))
        .unwrap_or_else(|| "-".to_string());

    if app.chart.is_empty() {
        frame.render_widget(
            Paragraph::new("no history for the selected asset")
                .block(Block::default().title(name).borders(Borders::ALL)),
            chunks[0],
        );
    } else {
        let price_data: Vec<(f64, f64)> = app
            .chart
            .iter()
            .enumerate()
            .map(|(idx, point)| (idx as f64, point.price))
            .collect();
        let (x_min, x_max) = x_bounds(&price_data);
        let (p_min, p_max) = y_bounds(&price_data);

        let price = Chart::new(vec![Dataset::default()
            .name("price")
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&price_data)])
        .block(
            Block::default()
                .title(price_chart_title(&name, app.history_days, app.currency))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(day_labels(app)),
        )
        .y_axis(
            Axis::default()
                .bounds([p_min, p_max])
                .labels(axis_labels(p_min, p_max)),
        );
        frame.render_widget(price, chunks[0]);
    }

    // Volumes in millions of the display currency.
    let volumes: Vec<u64> = app
        .chart
        .iter()
        .map(|point| (point.volume / 1e6).max(0.0).round() as u64)
        .collect();
    frame.render_widget(
        Sparkline::default()
            .block(
                Block::default()
                    .title("Daily volume (M)")
                    .borders(Borders::ALL),
            )
            .style(Style::default().fg(Color::Magenta))
            .data(volumes),
        chunks[1],
    );

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        "Top gainers",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.extend(mover_lines(&app.movers.gainers));
    lines.push(Line::from(Span::styled(
        "Top losers",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.extend(mover_lines(&app.movers.losers));
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().title("Movers (24h)").borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        chunks[2],
    );
}

fn price_chart_title(name: &str, days: u32, currency: CurrencyCode) -> String {
    format!("{name} · {days}d price ({currency})")
}

fn mover_lines(movers: &[Mover]) -> Vec<Line<'static>> {
    if movers.is_empty() {
        return vec![Line::from("  none")];
    }
    movers
        .iter()
        .map(|mover| {
            Line::from(vec![
                Span::raw(format!("  {:<6} ", mover.symbol)),
                Span::styled(mover.change.clone(), change_style(mover.change_percent > 0.0)),
            ])
        })
        .collect()
}

fn x_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let mut x_max = points.last().map(|p| p.0).unwrap_or(x_min + 1.0);
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    (x_min, x_max)
}

fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, y) in points {
        min = min.min(*y);
        max = max.max(*y);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max <= min {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn axis_labels(min: f64, max: f64) -> Vec<Line<'static>> {
    let mid = (min + max) / 2.0;
    vec![
        Line::from(format!("{min:.2}")),
        Line::from(format!("{mid:.2}")),
        Line::from(format!("{max:.2}")),
    ]
}

/// First, middle and last day of the sampled chart.
fn day_labels(app: &App) -> Vec<Line<'static>> {
    let n = app.chart.len();
    [0, n / 2, n.saturating_sub(1)]
        .iter()
        .filter_map(|idx| app.chart.get(*idx))
        .map(|point| Line::from(point.label.clone()))
        .collect()
}

fn draw_logs(frame: &mut Frame, area: Rect, app: &App) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let text: Vec<Line> = app
        .log_store
        .lock()
        .tail(max_lines)
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().title("Logs").borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(
        "↑/↓ select · c currency · q quit",
    )];
    if let Some(err) = app.last_error.as_ref() {
        spans.push(Span::styled(
            format!("  error: {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::{axis_labels, price_chart_title, x_bounds, y_bounds};
    use marketpulse_domain::value_objects::currency::CurrencyCode;

    #[test]
    fn chart_title_names_the_history_window() {
        assert_eq!(
            price_chart_title("Bitcoin (BTC)", 3, CurrencyCode::Eur),
            "Bitcoin (BTC) · 3d price (EUR)"
        );
    }

    #[test]
    fn bounds_pad_and_handle_degenerate_series() {
        assert_eq!(x_bounds(&[]), (0.0, 1.0));
        assert_eq!(y_bounds(&[]), (0.0, 1.0));
        assert_eq!(y_bounds(&[(0.0, 5.0), (1.0, 5.0)]), (4.0, 6.0));
        let (lo, hi) = y_bounds(&[(0.0, 100.0), (1.0, 200.0)]);
        assert!((lo - 95.0).abs() < 1e-9);
        assert!((hi - 205.0).abs() < 1e-9);
    }

    #[test]
    fn axis_labels_show_min_mid_max() {
        let labels: Vec<String> = axis_labels(1.0, 3.0)
            .into_iter()
            .map(|line| line.to_string())
            .collect();
        assert_eq!(labels, vec!["1.00", "2.00", "3.00"]);
    }
}
