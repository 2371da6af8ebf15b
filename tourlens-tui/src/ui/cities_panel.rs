//! Panel 1 — Cities: the event table, selection, and a one-line result per city.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tourlens_runner::display::{percent, truncate};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let session = &app.session;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Selected: ", theme::muted()),
        Span::styled(
            format!("{}/{}", app.cities.selected.len(), app.city_count()),
            theme::accent(),
        ),
        Span::styled(
            "  [Space]toggle [a]ll [d]eselect [Enter]window",
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(""));

    if app.city_count() == 0 {
        lines.push(Line::from(Span::styled(
            "No events registered. Add an [events] table to tourlens.toml.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "    {:<16} {:<11} {:>5} {:>10}  {}",
            "City", "Event", "Obs", "Change", "Note"
        ),
        theme::accent_bold(),
    )));

    // Keep the cursor row on screen.
    let visible = area.height.saturating_sub(3) as usize;
    let start = app
        .cities
        .cursor
        .saturating_sub(visible.saturating_sub(1));
    let events = session.registry.events();

    for (i, event) in events.iter().enumerate().skip(start).take(visible) {
        let is_cursor = i == app.cities.cursor;
        let is_selected = app.is_selected(&event.entity);
        let check = if is_selected { "[x]" } else { "[ ]" };

        let (obs, change, note, note_style) = if !session.store.has_column(&event.entity) {
            (0, None, "no data column".to_string(), theme::warning())
        } else {
            match session.compare_entity(&event.entity) {
                Ok(cmp) => {
                    let r = &cmp.result;
                    let (note, style) = if r.percent_change.is_none() {
                        (r.coverage.label().to_string(), theme::muted())
                    } else if r.baseline_near_zero {
                        ("unstable baseline".to_string(), theme::warning())
                    } else if r.is_significant() {
                        ("significant".to_string(), theme::positive())
                    } else {
                        (String::new(), theme::muted())
                    };
                    (cmp.window.len(), r.percent_change, note, style)
                }
                Err(e) => (0, None, e.to_string(), theme::negative()),
            }
        };

        let row_style = if is_cursor {
            theme::cursor()
        } else if is_selected {
            theme::accent()
        } else {
            theme::muted()
        };
        let change_style = if is_cursor {
            row_style
        } else {
            theme::change(change)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{check} "), row_style),
            Span::styled(format!("{:<16} ", truncate(&event.entity, 16)), row_style),
            Span::styled(format!("{:<11} ", event.pivot), row_style),
            Span::styled(format!("{obs:>5} "), row_style),
            Span::styled(format!("{:>10}", percent(change)), change_style),
            Span::raw("  "),
            Span::styled(note, note_style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
