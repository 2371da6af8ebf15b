//! First-run welcome popup.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

const STEPS: [&str; 4] = [
    "j / k walks the tour, Enter opens a city's window",
    "Space selects cities, 3 compares the selection",
    "+ / - and [ / ] resize the window, w toggles the t-test",
    "5 lists every key",
];

pub fn render_welcome(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(64, 50, area);
    f.render_widget(Clear, popup);

    let session = &app.session;
    let span = session
        .store
        .date_range()
        .map(|(a, b)| format!("{a} to {b}"))
        .unwrap_or_else(|| "no rows".into());

    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Loaded ", theme::muted()),
            Span::styled(session.source().display().to_string(), theme::accent()),
        ]),
        Line::from(Span::styled(
            format!("{span}, {} cities with events", app.city_count()),
            theme::muted(),
        )),
        Line::from(""),
    ];
    for (i, step) in STEPS.iter().enumerate() {
        text.push(Line::from(vec![
            Span::styled(format!("  {}. ", i + 1), theme::accent_bold()),
            Span::styled(*step, theme::muted()),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Any key closes this.",
        theme::neutral(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" TourLens ")
        .title_style(theme::accent_bold());
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use crate::app::Overlay;
    use crate::test_helpers::{render_to_string, test_app};

    #[test]
    fn welcome_names_the_data_source() {
        let mut app = test_app();
        app.overlay = Overlay::Welcome;
        let screen = render_to_string(&app, 120, 40);
        assert!(screen.contains("Loaded sample.csv"));
        assert!(screen.contains("2024-01-01 to 2024-12-31"));
        assert!(screen.contains("Any key closes this."));
    }
}
