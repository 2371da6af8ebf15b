//! Panel 2 — Window: the focused city's series around its event, with the
//! pivot marked, both partition means drawn, and the statistics below.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use tourlens_core::stats::PartitionStats;
use tourlens_core::{ComparisonResult, EntityComparison};
use tourlens_runner::display::{opt, p_value, percent};

use crate::app::AppState;
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match app.focused_comparison() {
        None => render_message(f, area, "No city to show. Register events first."),
        Some(Err(e)) => render_message(f, area, &e.to_string()),
        Some(Ok(cmp)) => render_comparison(f, area, &cmp, app),
    }
}

fn render_message(f: &mut Frame, area: Rect, msg: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(msg.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_comparison(f: &mut Frame, area: Rect, cmp: &EntityComparison, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(6),
        ])
        .split(area);

    render_header(f, chunks[0], cmp, app);
    if cmp.window.is_empty() {
        render_message(
            f,
            chunks[1],
            &format!(
                "No observations for {} within ±{} days of {}.",
                cmp.event.entity, app.session.settings.half_width_days, cmp.event.pivot
            ),
        );
    } else {
        render_chart(f, chunks[1], cmp, app.session.settings.half_width_days);
    }
    render_stats(f, chunks[2], &cmp.result, app.session.settings.alpha);
}

fn render_header(f: &mut Frame, area: Rect, cmp: &EntityComparison, app: &AppState) {
    let r = &cmp.result;
    let marker = if app.is_selected(&r.entity) { "[x] " } else { "[ ] " };
    let line = Line::from(vec![
        Span::styled(marker, theme::muted()),
        Span::styled(r.entity.clone(), theme::accent_bold()),
        Span::styled(format!("  event {}", r.pivot), theme::warning()),
        Span::styled(
            format!(
                "  window {} to {}  ({} obs, {})",
                r.window_start,
                r.window_end,
                cmp.window.len(),
                r.coverage.label()
            ),
            theme::muted(),
        ),
        Span::styled("  [h/l]city [Space]select", theme::muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_chart(f: &mut Frame, area: Rect, cmp: &EntityComparison, half_width: i64) {
    let partition = cmp.window.partition(cmp.event.pivot);
    let to_xy = |points: &[tourlens_core::Point]| -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|p| (cmp.event.offset_of(p.date) as f64, p.value))
            .collect()
    };
    let pre = to_xy(partition.pre);
    let post = to_xy(partition.post);

    let (min_y, max_y) = cmp
        .window
        .points()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    let padding = ((max_y - min_y).abs() * 0.05).max(0.5);
    let y_min = min_y - padding;
    let y_max = max_y + padding;
    let x_min = -(half_width as f64);
    let x_max = (half_width as f64).max(1.0);

    let pivot_line = [(0.0, y_min), (0.0, y_max)];
    let pre_mean: Vec<(f64, f64)> = cmp
        .result
        .pre_mean()
        .map(|m| vec![(x_min, m), (0.0, m)])
        .unwrap_or_default();
    let post_mean: Vec<(f64, f64)> = cmp
        .result
        .post_mean()
        .map(|m| vec![(0.0, m), (x_max, m)])
        .unwrap_or_default();

    let theme = Theme::default();
    let datasets = vec![
        Dataset::default()
            .name("before")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme.neutral))
            .graph_type(GraphType::Line)
            .data(&pre),
        Dataset::default()
            .name("after")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme.accent))
            .graph_type(GraphType::Line)
            .data(&post),
        Dataset::default()
            .name("event")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme.warning))
            .graph_type(GraphType::Line)
            .data(&pivot_line),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(theme.neutral))
            .graph_type(GraphType::Line)
            .data(&pre_mean),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(theme.accent))
            .graph_type(GraphType::Line)
            .data(&post_mean),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("Days from event", theme::muted()))
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(format!("{}", -half_width), theme::muted()),
                    Span::styled("0", theme::warning()),
                    Span::styled(format!("+{half_width}"), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Value", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}"), theme::muted()),
                    Span::styled(format!("{y_max:.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_stats(f: &mut Frame, area: Rect, r: &ComparisonResult, alpha: f64) {
    let theme = Theme::default();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!(
            "{:<8} {:>5} {:>10} {:>10} {:>10} {:>10}",
            "", "n", "Mean", "Std Dev", "Min", "Max"
        ),
        theme::accent_bold(),
    )));
    lines.push(stats_line("Before", r.pre, theme::neutral()));
    lines.push(stats_line("After", r.post, theme::accent()));

    let mut change = vec![
        Span::styled("Change ", theme::muted()),
        Span::styled(
            percent(r.percent_change),
            Style::default().fg(theme.change_color(r.percent_change)),
        ),
    ];
    if r.baseline_near_zero {
        change.push(Span::styled(
            "  pre-event mean near zero, change is unstable",
            theme::warning(),
        ));
    }
    lines.push(Line::from(change));

    let test = match (r.welch, r.verdict) {
        (Some(w), verdict) => Line::from(vec![
            Span::styled(
                format!("t {:.3}  df {:.1}  p ", w.t_statistic, w.df),
                theme::muted(),
            ),
            Span::styled(
                p_value(Some(w.p_value)),
                Style::default().fg(theme.p_value_color(Some(w.p_value), alpha)),
            ),
            Span::styled(
                format!(
                    "  {} at α {alpha}",
                    verdict.map_or("n/a", |v| v.label())
                ),
                if r.is_significant() {
                    theme::positive()
                } else {
                    theme::muted()
                },
            ),
        ]),
        (None, _) => Line::from(Span::styled(
            "Welch t-test n/a",
            theme::muted(),
        )),
    };
    lines.push(test);

    f.render_widget(Paragraph::new(lines), area);
}

fn stats_line(label: &str, stats: Option<PartitionStats>, style: Style) -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "{:<8} {:>5} {:>10} {:>10} {:>10} {:>10}",
            label,
            stats.map_or(0, |s| s.count),
            opt(stats.map(|s| s.mean), 3),
            opt(stats.and_then(|s| s.std_dev), 3),
            opt(stats.map(|s| s.min), 3),
            opt(stats.map(|s| s.max), 3),
        ),
        style,
    ))
}
