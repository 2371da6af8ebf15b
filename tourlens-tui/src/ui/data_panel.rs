//! Panel 4 — Data: the focused city's window as a table of daily points.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    let cmp = match app.focused_comparison() {
        None => {
            lines.push(Line::from(Span::styled("No city focused.", theme::muted())));
            f.render_widget(Paragraph::new(lines), area);
            return;
        }
        Some(Err(e)) => {
            lines.push(Line::from(Span::styled(e.to_string(), theme::negative())));
            f.render_widget(Paragraph::new(lines), area);
            return;
        }
        Some(Ok(cmp)) => cmp,
    };

    let points = cmp.window.points();
    lines.push(Line::from(vec![
        Span::styled(cmp.event.entity.clone(), theme::accent_bold()),
        Span::styled(
            format!(
                "  {} to {}  {} points",
                cmp.window.start,
                cmp.window.end,
                points.len()
            ),
            theme::muted(),
        ),
        Span::styled("  [j/k]scroll [g/G]top/end [h/l]city", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if points.is_empty() {
        lines.push(Line::from(Span::styled(
            "No observations in this window.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!("{:<12} {:>7}  {:<6} {:>10}", "Date", "Offset", "Side", "Value"),
        theme::accent_bold(),
    )));

    let visible = (area.height as usize).saturating_sub(lines.len());
    let max_scroll = points.len().saturating_sub(visible);
    let scroll = app.data.scroll.min(max_scroll);

    for p in points.iter().skip(scroll).take(visible) {
        let offset = cmp.event.offset_of(p.date);
        // The event day itself belongs to the post side.
        let (side, style) = if offset < 0 {
            ("pre", theme::neutral())
        } else {
            ("post", theme::accent())
        };
        let date_style = if offset == 0 {
            theme::warning()
        } else {
            theme::muted()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12} ", p.date), date_style),
            Span::styled(format!("{offset:>+7}  "), theme::muted()),
            Span::styled(format!("{side:<6} "), style),
            Span::styled(format!("{:>10.3}", p.value), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
