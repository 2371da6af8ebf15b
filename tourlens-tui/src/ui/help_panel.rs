//! Panel 5 — Help: keyboard shortcuts and how to read the numbers.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let settings = &app.session.settings;
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-5", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "+ / -", "Widen / narrow the window by one day");
    key(&mut lines, "] / [", "Widen / narrow the window by a week");
    key(&mut lines, "w", "Toggle the Welch t-test");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Cities");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "g / G", "Jump to first / last city");
    key(&mut lines, "Space", "Toggle city selection");
    key(&mut lines, "a / d", "Select all / clear selection");
    key(&mut lines, "Enter", "Open the city's window");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Window");
    key(&mut lines, "h / l", "Previous / next city");
    key(&mut lines, "Space", "Toggle city selection");
    key(&mut lines, "Enter", "Show the window's data points");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Compare");
    key(&mut lines, "s", "Cycle sort: input → change → p-value");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — Data");
    key(&mut lines, "j / k", "Scroll one row");
    key(&mut lines, "PgDn / PgUp", "Scroll ten rows");
    key(&mut lines, "g / G", "Jump to top / end");
    key(&mut lines, "h / l", "Previous / next city");
    lines.push(Line::from(""));

    section(&mut lines, "Reading the numbers");
    key(
        &mut lines,
        "Window",
        &format!(
            "Event date ±{} days; the event day counts as after",
            settings.half_width_days
        ),
    );
    key(&mut lines, "Change", "(after mean − before mean) / before mean × 100");
    key(
        &mut lines,
        "p",
        &format!("Welch two-sided p-value; * marks p < {}", settings.alpha),
    );
    key(&mut lines, "!", "Before mean near zero; the change is unstable");
    key(&mut lines, "n/a", "Not enough observations to compute");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
