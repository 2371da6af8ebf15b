//! Keyboard input dispatch — overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(panel) = Panel::from_index(index) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.adjust_half_width(1);
            return;
        }
        KeyCode::Char('-') => {
            app.adjust_half_width(-1);
            return;
        }
        KeyCode::Char(']') => {
            app.adjust_half_width(7);
            return;
        }
        KeyCode::Char('[') => {
            app.adjust_half_width(-7);
            return;
        }
        KeyCode::Char('w') => {
            app.toggle_welch();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Cities => handle_cities_key(app, key),
        Panel::Window => handle_window_key(app, key),
        Panel::Compare => handle_compare_key(app, key),
        Panel::Data => handle_data_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_cities_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_focus(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_focus(-1),
        KeyCode::Char('g') | KeyCode::Home => app.move_focus(isize::MIN),
        KeyCode::Char('G') | KeyCode::End => app.move_focus(isize::MAX),
        KeyCode::Char(' ') => app.toggle_focused(),
        KeyCode::Char('a') => {
            app.select_all();
            app.set_status(format!("Selected all {} cities", app.city_count()));
        }
        KeyCode::Char('d') => {
            app.cities.selected.clear();
            app.set_status("Selection cleared");
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => open_window(app),
        _ => {}
    }
}

/// Switch to the Window panel, flagging a focused city that has nothing to show.
fn open_window(app: &mut AppState) {
    match app.focused_comparison() {
        None => return,
        Some(Err(e)) => app.set_error(e.to_string()),
        Some(Ok(cmp)) if cmp.window.is_empty() => app.set_warning(format!(
            "No observations for {} within ±{} days",
            cmp.event.entity, app.session.settings.half_width_days
        )),
        Some(Ok(_)) => {}
    }
    app.active_panel = Panel::Window;
}

fn handle_window_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => {
            app.move_focus(-1)
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => {
            app.move_focus(1)
        }
        KeyCode::Char(' ') => app.toggle_focused(),
        KeyCode::Enter => app.active_panel = Panel::Data,
        _ => {}
    }
}

fn handle_compare_key(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('s') = key.code {
        app.cycle_sort();
    }
}

fn handle_data_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.data.scroll = app.data.scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => app.data.scroll = app.data.scroll.saturating_sub(1),
        KeyCode::PageDown => app.data.scroll = app.data.scroll.saturating_add(10),
        KeyCode::PageUp => app.data.scroll = app.data.scroll.saturating_sub(10),
        KeyCode::Char('g') | KeyCode::Home => app.data.scroll = 0,
        // The panel clamps the offset against the row count when drawing.
        KeyCode::Char('G') | KeyCode::End => app.data.scroll = usize::MAX,
        KeyCode::Char('h') | KeyCode::Left => app.move_focus(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_focus(1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_app;
    use crossterm::event::KeyEventState;
    use crate::app::StatusLevel;
    use proptest::prelude::*;
    use tourlens_core::EventRegistry;
    use tourlens_runner::SortKey;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_panel, Panel::Compare);
        handle_key(&mut app, press(KeyCode::Char('5')));
        assert_eq!(app.active_panel, Panel::Help);
        handle_key(&mut app, press(KeyCode::Char('9')));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn tab_cycles() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Window);
        handle_key(&mut app, press(KeyCode::BackTab));
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn welcome_swallows_first_key() {
        let mut app = test_app();
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.overlay, Overlay::None);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn release_events_ignored() {
        let mut app = test_app();
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn cities_navigation_and_selection() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char(' ')));
        assert_eq!(app.selected_cities(), vec!["Melbourne"]);
        handle_key(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.focused_city(), Some("Rio de Janeiro"));
        handle_key(&mut app, press(KeyCode::Char('g')));
        assert_eq!(app.focused_city(), Some("Tokyo"));
        handle_key(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.selected_cities().len(), app.city_count());
        handle_key(&mut app, press(KeyCode::Char('d')));
        assert!(app.selected_cities().is_empty());
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.active_panel, Panel::Window);
    }

    #[test]
    fn half_width_keys() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Char('+')));
        assert_eq!(app.session.settings.half_width_days, 31);
        handle_key(&mut app, press(KeyCode::Char('[')));
        assert_eq!(app.session.settings.half_width_days, 24);
        handle_key(&mut app, press(KeyCode::Char('-')));
        assert_eq!(app.session.settings.half_width_days, 23);
    }

    #[test]
    fn compare_sort_key() {
        let mut app = test_app();
        app.active_panel = Panel::Compare;
        handle_key(&mut app, press(KeyCode::Char('s')));
        assert_eq!(app.compare.sort, SortKey::Change);
    }

    #[test]
    fn data_scroll_resets_on_focus_change() {
        let mut app = test_app();
        app.active_panel = Panel::Data;
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.data.scroll, 2);
        handle_key(&mut app, press(KeyCode::Char('l')));
        assert_eq!(app.data.scroll, 0);
        assert_eq!(app.focused_city(), Some("Melbourne"));
    }

    #[test]
    fn enter_flags_cities_without_data() {
        let mut app = test_app();
        app.session.registry =
            EventRegistry::from_pairs([("Tokyo", "2030-01-01"), ("Atlantis", "2024-05-01")])
                .unwrap();

        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.active_panel, Panel::Window);
        let (msg, level) = app.status_message.clone().unwrap();
        assert!(msg.starts_with("No observations for Tokyo"));
        assert_eq!(level, StatusLevel::Warning);

        app.active_panel = Panel::Cities;
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.status_message.unwrap().1, StatusLevel::Error);
    }

    fn any_key() -> impl Strategy<Value = KeyCode> {
        prop_oneof![
            prop::sample::select(vec![
                'j', 'k', 'h', 'l', 'g', 'G', ' ', 'a', 'd', 's', 'w', '+', '-', '[', ']', '1',
                '2', '3', '4', '5',
            ])
            .prop_map(KeyCode::Char),
            Just(KeyCode::Enter),
            Just(KeyCode::Tab),
            Just(KeyCode::BackTab),
            Just(KeyCode::PageDown),
            Just(KeyCode::PageUp),
            Just(KeyCode::End),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn key_sequences_keep_state_in_bounds(keys in prop::collection::vec(any_key(), 0..60)) {
            let mut app = test_app();
            for code in keys {
                handle_key(&mut app, press(code));
            }
            prop_assert!(app.running);
            prop_assert!(app.cities.cursor < app.city_count());
            let hw = app.session.settings.half_width_days;
            prop_assert!((0..=crate::app::MAX_HALF_WIDTH).contains(&hw));
            prop_assert!(app.selected_cities().len() <= app.city_count());
        }
    }
}
