//! Session — the observation table and event table, loaded once.
//!
//! A session is immutable apart from its compare settings. Every query
//! recomputes from the table, so changing the half width between calls is
//! always consistent.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};
use tourlens_core::{
    compare_entity, compare_many, CompareSettings, EntityComparison, EventRegistry,
    MultiComparison, ObservationStore, QueryError, StoreError,
};

use crate::config::{ConfigError, RunnerConfig};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot load observations: {0}")]
    Store(#[from] StoreError),
}

/// Listing row for the cities view.
#[derive(Debug, Clone, PartialEq)]
pub struct CityStatus {
    pub entity: String,
    pub pivot: NaiveDate,
    /// The table has a column for this city.
    pub has_column: bool,
    /// Non-missing observations in the current window.
    pub window_observations: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub store: ObservationStore,
    pub registry: EventRegistry,
    pub settings: CompareSettings,
    source: PathBuf,
}

impl Session {
    /// Build the registry and load the table named by `config`.
    pub fn open(config: &RunnerConfig) -> Result<Self, SessionError> {
        let registry = config.registry()?;
        let store = ObservationStore::load(&config.data.path, &config.load_options())?;
        let session = Self::from_parts(store, registry, config.window, &config.data.path);
        session.report_coverage();
        Ok(session)
    }

    pub fn from_parts(
        store: ObservationStore,
        registry: EventRegistry,
        settings: CompareSettings,
        source: &Path,
    ) -> Self {
        Self {
            store,
            registry,
            settings,
            source: source.to_path_buf(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn report_coverage(&self) {
        let (first, last) = match self.store.date_range() {
            Some((a, b)) => (a.to_string(), b.to_string()),
            None => ("-".into(), "-".into()),
        };
        info!(
            source = %self.source.display(),
            rows = self.store.row_count(),
            columns = self.store.columns().len(),
            first = %first,
            last = %last,
            events = self.registry.len(),
            "session ready"
        );
        for entity in self.registry.entities() {
            if !self.store.has_column(entity) {
                warn!(entity, "registered city has no data column");
            }
        }
    }

    pub fn compare_entity(&self, entity: &str) -> Result<EntityComparison, QueryError> {
        compare_entity(&self.store, &self.registry, entity, &self.settings)
    }

    pub fn compare_many<S: AsRef<str>>(&self, entities: &[S]) -> MultiComparison {
        compare_many(&self.store, &self.registry, entities, &self.settings)
    }

    /// Compare every registered city, in registration order.
    pub fn compare_all(&self) -> MultiComparison {
        self.compare_many(&self.registry.entities())
    }

    /// `entities`, or every registered city when empty.
    pub fn compare_selection<S: AsRef<str>>(&self, entities: &[S]) -> MultiComparison {
        if entities.is_empty() {
            self.compare_all()
        } else {
            self.compare_many(entities)
        }
    }

    pub fn city_status(&self) -> Vec<CityStatus> {
        self.registry
            .events()
            .iter()
            .map(|event| {
                let window_observations = self
                    .compare_entity(&event.entity)
                    .map(|c| c.window.len())
                    .unwrap_or(0);
                CityStatus {
                    entity: event.entity.clone(),
                    pivot: event.pivot,
                    has_column: self.store.has_column(&event.entity),
                    window_observations,
                }
            })
            .collect()
    }
}
