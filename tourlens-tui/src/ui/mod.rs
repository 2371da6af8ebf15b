//! Frame layout: the active panel above a status bar, overlays drawn last.

pub mod cities_panel;
pub mod compare_panel;
pub mod data_panel;
pub mod help_panel;
pub mod overlays;
pub mod status_bar;
pub mod window_panel;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme::{self, Theme};

/// Active panel above a one-line status bar, overlays on top.
pub fn draw(f: &mut Frame, app: &AppState) {
    let [body, status] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());

    let panel = app.active_panel;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true))
        .style(Style::default().bg(Theme::default().background));
    let inner = block.inner(body);
    f.render_widget(block, body);

    match panel {
        Panel::Cities => cities_panel::render(f, inner, app),
        Panel::Window => window_panel::render(f, inner, app),
        Panel::Compare => compare_panel::render(f, inner, app),
        Panel::Data => data_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }

    status_bar::render(f, status, app);

    if app.overlay == Overlay::Welcome {
        overlays::render_welcome(f, body, app);
    }
}

/// `percent_x` by `percent_y` of `area`, centered.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{render_to_string, test_app};

    #[test]
    fn every_panel_renders_its_title() {
        let mut app = test_app();
        for i in 0..Panel::COUNT {
            let panel = Panel::from_index(i).unwrap();
            app.active_panel = panel;
            let screen = render_to_string(&app, 120, 40);
            assert!(
                screen.contains(&format!(" {} [{}] ", panel.label(), i + 1)),
                "missing title for {panel:?}"
            );
        }
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = test_app();
        for i in 0..Panel::COUNT {
            app.active_panel = Panel::from_index(i).unwrap();
            render_to_string(&app, 20, 5);
        }
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!(popup.x >= 20 && popup.right() <= 80);
        assert!(popup.y >= 15 && popup.bottom() <= 35);
    }
}
