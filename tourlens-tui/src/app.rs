//! Application state — single-owner, main-thread only.
//!
//! Only the selection and parameters live here. Windows, statistics and
//! rankings are recomputed from the session whenever a panel draws.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use tourlens_core::{EntityComparison, MultiComparison, QueryError};
use tourlens_runner::{sort_results, Session, SortKey};

/// Largest half width the +/- keys reach.
pub const MAX_HALF_WIDTH: i64 = tourlens_core::MAX_HALF_WIDTH_DAYS;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Panel {
    #[default]
    Cities,
    Window,
    Compare,
    Data,
    Help,
}

impl Panel {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Panel::Cities => 0,
            Panel::Window => 1,
            Panel::Compare => 2,
            Panel::Data => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Cities),
            1 => Some(Panel::Window),
            2 => Some(Panel::Compare),
            3 => Some(Panel::Data),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Cities => "Cities",
            Panel::Window => "Window",
            Panel::Compare => "Compare",
            Panel::Data => "Data",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Cities)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT)
            .unwrap_or(Panel::Cities)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
}

/// Cities panel: cursor doubles as the focused city for Window and Data.
#[derive(Debug, Default)]
pub struct CitiesPanelState {
    pub cursor: usize,
    pub selected: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct ComparePanelState {
    pub sort: SortKey,
}

#[derive(Debug, Default)]
pub struct DataPanelState {
    pub scroll: usize,
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,

    pub session: Session,

    pub cities: CitiesPanelState,
    pub compare: ComparePanelState,
    pub data: DataPanelState,

    pub status_message: Option<(String, StatusLevel)>,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            active_panel: Panel::Cities,
            running: true,
            session,
            cities: CitiesPanelState::default(),
            compare: ComparePanelState::default(),
            data: DataPanelState::default(),
            status_message: None,
            overlay: Overlay::None,
        }
    }

    pub fn city_count(&self) -> usize {
        self.session.registry.len()
    }

    /// City under the Cities cursor.
    pub fn focused_city(&self) -> Option<&str> {
        self.session
            .registry
            .events()
            .get(self.cities.cursor)
            .map(|e| e.entity.as_str())
    }

    /// Move the cursor to `entity`. Returns false if it is not registered.
    pub fn focus(&mut self, entity: &str) -> bool {
        match self
            .session
            .registry
            .events()
            .iter()
            .position(|e| e.entity == entity)
        {
            Some(i) => {
                self.cities.cursor = i;
                self.data.scroll = 0;
                true
            }
            None => false,
        }
    }

    /// Step the focused city, clamped to the list.
    pub fn move_focus(&mut self, delta: isize) {
        let count = self.city_count();
        if count == 0 {
            return;
        }
        let next = self.cities.cursor.saturating_add_signed(delta).min(count - 1);
        if next != self.cities.cursor {
            self.cities.cursor = next;
            self.data.scroll = 0;
        }
    }

    pub fn toggle_focused(&mut self) {
        let Some(entity) = self.focused_city().map(str::to_string) else {
            return;
        };
        if !self.cities.selected.remove(&entity) {
            self.cities.selected.insert(entity);
        }
    }

    pub fn select_all(&mut self) {
        self.cities.selected = self
            .session
            .registry
            .entities()
            .into_iter()
            .map(String::from)
            .collect();
    }

    pub fn is_selected(&self, entity: &str) -> bool {
        self.cities.selected.contains(entity)
    }

    /// Selected cities in registration order.
    pub fn selected_cities(&self) -> Vec<&str> {
        self.session
            .registry
            .entities()
            .into_iter()
            .filter(|e| self.cities.selected.contains(*e))
            .collect()
    }

    /// Window comparison for the focused city.
    pub fn focused_comparison(&self) -> Option<Result<EntityComparison, QueryError>> {
        self.focused_city()
            .map(|entity| self.session.compare_entity(entity))
    }

    /// Multi-city comparison over the selection (every city when none is
    /// selected), in the current sort order.
    pub fn comparison(&self) -> MultiComparison {
        let mut out = self.session.compare_selection(&self.selected_cities());
        sort_results(&mut out.results, self.compare.sort);
        out
    }

    pub fn adjust_half_width(&mut self, delta: i64) {
        let settings = &mut self.session.settings;
        let next = (settings.half_width_days + delta).clamp(0, MAX_HALF_WIDTH);
        if next != settings.half_width_days {
            settings.half_width_days = next;
            self.data.scroll = 0;
            self.set_status(format!("Window ±{next} days"));
        }
    }

    pub fn toggle_welch(&mut self) {
        let settings = &mut self.session.settings;
        settings.welch_test = !settings.welch_test;
        let msg = if settings.welch_test {
            "Welch t-test on"
        } else {
            "Welch t-test off"
        };
        self.set_status(msg);
    }

    pub fn cycle_sort(&mut self) {
        self.compare.sort = self.compare.sort.next();
        self.set_status(format!("Sort by {}", self.compare.sort));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
