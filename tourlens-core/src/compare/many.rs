//! Multi-city comparator.
//!
//! Runs the window comparator for each requested city, in the order given.
//! A city that cannot be scored is recorded in `skipped` and the rest carry
//! on; nothing here aborts a batch.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::settings::CompareSettings;
use super::window::{compare, window_bounds};
use crate::data::{ObservationStore, StoreError};
use crate::domain::{ComparisonResult, Coverage, Event, Window};
use crate::registry::{EventRegistry, RegistryError};

/// Failure of a single-city query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything the single-city view needs: the event, its window, the result.
#[derive(Debug, Clone)]
pub struct EntityComparison {
    pub event: Event,
    pub window: Window,
    pub result: ComparisonResult,
}

/// Resolve, slice and compare one city.
pub fn compare_entity(
    store: &ObservationStore,
    registry: &EventRegistry,
    entity: &str,
    settings: &CompareSettings,
) -> Result<EntityComparison, QueryError> {
    let event = registry.event(entity)?.clone();
    let (start, end) = window_bounds(event.pivot, settings.half_width_days);
    let window = store.slice(entity, start, end)?;
    let result = compare(&window, event.pivot, settings);

    debug!(
        entity,
        pivot = %event.pivot,
        observations = window.len(),
        coverage = result.coverage.label(),
        "compared window"
    );

    Ok(EntityComparison {
        event,
        window,
        result,
    })
}

/// Why a city is absent from `MultiComparison::results`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownEntity,
    UnknownColumn,
    NoData,
    MissingPre,
    MissingPost,
    ZeroBaseline,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::UnknownEntity => "no registered event",
            SkipReason::UnknownColumn => "no data column",
            SkipReason::NoData => "no data in window",
            SkipReason::MissingPre => "no data before event",
            SkipReason::MissingPost => "no data after event",
            SkipReason::ZeroBaseline => "pre-event mean is zero",
        }
    }

    fn from_result(result: &ComparisonResult) -> Self {
        match result.coverage {
            Coverage::NoData => SkipReason::NoData,
            Coverage::MissingPre => SkipReason::MissingPre,
            Coverage::MissingPost => SkipReason::MissingPost,
            Coverage::Complete => SkipReason::ZeroBaseline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntity {
    pub entity: String,
    pub reason: SkipReason,
}

/// Output of `compare_many`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MultiComparison {
    /// Results with a defined percent change, in input order.
    pub results: Vec<ComparisonResult>,
    /// Cities left out, in input order.
    pub skipped: Vec<SkippedEntity>,
}

impl MultiComparison {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, entity: &str) -> Option<&ComparisonResult> {
        self.results.iter().find(|r| r.entity == entity)
    }
}

/// Compare every city in `entities`.
///
/// Repeated names are compared once, at their first position.
pub fn compare_many<S: AsRef<str>>(
    store: &ObservationStore,
    registry: &EventRegistry,
    entities: &[S],
    settings: &CompareSettings,
) -> MultiComparison {
    let mut out = MultiComparison::default();
    let mut seen = HashSet::new();

    for entity in entities.iter().map(|e| e.as_ref()) {
        if !seen.insert(entity) {
            continue;
        }

        let skip = |reason| SkippedEntity {
            entity: entity.to_string(),
            reason,
        };

        match compare_entity(store, registry, entity, settings) {
            Ok(cmp) if cmp.result.percent_change.is_some() => out.results.push(cmp.result),
            Ok(cmp) => {
                let reason = SkipReason::from_result(&cmp.result);
                debug!(entity, reason = reason.label(), "left out of comparison");
                out.skipped.push(skip(reason));
            }
            Err(QueryError::Registry(e)) => {
                warn!(entity, error = %e, "skipping city");
                out.skipped.push(skip(SkipReason::UnknownEntity));
            }
            Err(QueryError::Store(e)) => {
                warn!(entity, error = %e, "skipping city");
                out.skipped.push(skip(SkipReason::UnknownColumn));
            }
        }
    }

    out
}
