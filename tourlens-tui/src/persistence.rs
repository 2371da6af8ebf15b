//! Dashboard state kept between runs: selection, focus, panel, sort order.
//!
//! Window settings are not stored; they come from the config file and flags.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tourlens_runner::SortKey;

use crate::app::{AppState, Overlay, Panel};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub selected_cities: Vec<String>,
    pub focused_city: Option<String>,
    pub active_panel: Panel,
    pub sort: SortKey,
    pub welcome_dismissed: bool,
}

/// Read the state file. A missing file is a first run; an unreadable one is
/// logged and replaced by defaults.
pub fn load(path: &Path) -> PersistedState {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return PersistedState::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read state file");
            return PersistedState::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
        PersistedState::default()
    })
}

/// Write through a sibling temp file so a crash never leaves half a file.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    debug!(path = %path.display(), "saved ui state");
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        selected_cities: app
            .selected_cities()
            .into_iter()
            .map(String::from)
            .collect(),
        focused_city: app.focused_city().map(String::from),
        active_panel: app.active_panel,
        sort: app.compare.sort,
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Restore saved state. Cities no longer registered are dropped.
pub fn apply(app: &mut AppState, state: PersistedState) {
    for city in state.selected_cities {
        if app.session.registry.contains(&city) {
            app.cities.selected.insert(city);
        } else {
            debug!(city = %city, "dropping unregistered city from saved selection");
        }
    }
    if let Some(city) = state.focused_city {
        app.focus(&city);
    }
    app.active_panel = state.active_panel;
    app.compare.sort = state.sort;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
