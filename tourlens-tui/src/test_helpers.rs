//! Test helpers for building an app over synthetic data

use std::path::Path;

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

use tourlens_core::sample::{generate, SampleSpec};
use tourlens_core::{CompareSettings, EventRegistry};
use tourlens_runner::Session;

use crate::app::AppState;

/// App over a year of generated data for the built-in tour.
pub fn test_app() -> AppState {
    let registry = EventRegistry::default_tour();
    let store = generate(&registry, &SampleSpec::default()).unwrap();
    let session = Session::from_parts(
        store,
        registry,
        CompareSettings::default(),
        Path::new("sample.csv"),
    );
    AppState::new(session)
}

/// Draw the whole UI once and return the screen as text, one line per row.
pub fn render_to_string(app: &AppState, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| crate::ui::draw(f, app)).unwrap();
    buffer_text(terminal.backend().buffer())
}

pub fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
