//! Panel 3 — Compare: every selected city side by side, with a percent-change bar.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tourlens_runner::display::{p_value, percent, truncate};
use tourlens_runner::text_bar;

use crate::app::AppState;
use crate::theme::{self, Theme};

const BAR_WIDTH: usize = 30;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = Theme::default();
    let alpha = app.session.settings.alpha;
    let multi = app.comparison();
    let mut lines: Vec<Line> = Vec::new();

    let scope = match app.cities.selected.len() {
        0 => "All cities".to_string(),
        n => format!("{n} selected"),
    };
    lines.push(Line::from(vec![
        Span::styled(scope, theme::accent()),
        Span::styled("  Sort: ", theme::muted()),
        Span::styled(app.compare.sort.label(), theme::accent()),
        Span::styled("  [s]ort [w]elch [+/-]window", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if multi.results.is_empty() && multi.skipped.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing to compare.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:<16} {:<11} {:>10} {:>10}   {}",
            "City", "Event", "Change", "p", "Change bar"
        ),
        theme::accent_bold(),
    )));

    let max_abs = multi
        .results
        .iter()
        .filter_map(|r| r.percent_change)
        .filter(|c| c.is_finite())
        .fold(0.0_f64, |acc, c| acc.max(c.abs()));

    for r in &multi.results {
        let marker = if r.baseline_near_zero {
            "!"
        } else if r.is_significant() {
            "*"
        } else {
            " "
        };
        let bar = r
            .percent_change
            .map(|c| text_bar(c, max_abs, BAR_WIDTH))
            .unwrap_or_default();

        lines.push(Line::from(vec![
            Span::styled(format!("{:<16} ", truncate(&r.entity, 16)), theme::accent()),
            Span::styled(format!("{:<11} ", r.pivot), theme::muted()),
            Span::styled(format!("{:>10} ", percent(r.percent_change)), theme::change(r.percent_change)),
            Span::styled(
                format!("{:>10}", p_value(r.p_value())),
                Style::default().fg(theme.p_value_color(r.p_value(), alpha)),
            ),
            Span::styled(format!(" {marker} "), theme::warning()),
            Span::styled(bar, theme::change(r.percent_change)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("* p < {alpha}   ! pre-event mean near zero"),
        theme::muted(),
    )));

    if !multi.skipped.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Skipped", theme::neutral())));
        for s in &multi.skipped {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<16} ", truncate(&s.entity, 16)), theme::muted()),
                Span::styled(s.reason.label(), theme::warning()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
