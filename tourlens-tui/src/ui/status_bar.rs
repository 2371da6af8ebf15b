//! Bottom line: panel tabs, current window settings, last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Panel, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let settings = &app.session.settings;

    let mut spans: Vec<Span> = (0..Panel::COUNT)
        .filter_map(Panel::from_index)
        .map(|p| {
            let style = if p == app.active_panel {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            Span::styled(format!(" {}:{}", p.index() + 1, p.label()), style)
        })
        .collect();

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("±{}d", settings.half_width_days),
        theme::accent(),
    ));
    spans.push(if settings.welch_test {
        Span::styled(format!(" Welch α={}", settings.alpha), theme::accent())
    } else {
        Span::styled(" Welch off", theme::warning())
    });

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
