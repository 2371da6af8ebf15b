//! Event registry — one concert date per city.
//!
//! Built once, either from the built-in 2024 tour table or from a config
//! table of `city = "date"` pairs, and read-only afterwards. Registration
//! order is kept so every view lists cities the same way.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::parse_date;
use crate::domain::Event;

/// Errors from building or querying the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no event registered for '{0}'")]
    UnknownEntity(String),

    #[error("invalid date '{value}' for '{entity}'")]
    InvalidDate { entity: String, value: String },

    #[error("'{0}' is registered twice")]
    DuplicateEntity(String),
}

/// The 2024 tour stops the dashboard was built around.
const DEFAULT_TOUR: &[(&str, &str)] = &[
    ("Tokyo", "Feb 7, 2024"),
    ("Melbourne", "Feb 16, 2024"),
    ("Sydney", "Feb 23, 2024"),
    ("Singapore", "Mar 2, 2024"),
    ("Stockholm", "May 17, 2024"),
    ("Dublin", "Jun 28, 2024"),
    ("Paris", "Jun 3, 2024"),
    ("London", "Jun 21, 2024"),
    ("Orlando", "Oct 18, 2024"),
    ("Rio de Janeiro", "Nov 17, 2024"),
];

/// Immutable city → pivot date mapping.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: Vec<Event>,
    index: HashMap<String, usize>,
}

impl EventRegistry {
    /// Build from parsed events. Rejects a city registered twice.
    pub fn new(events: Vec<Event>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            if index.insert(event.entity.clone(), i).is_some() {
                return Err(RegistryError::DuplicateEntity(event.entity.clone()));
            }
        }
        Ok(Self { events, index })
    }

    /// Build from `(city, date text)` pairs, parsing each date.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let events = pairs
            .into_iter()
            .map(|(entity, raw)| {
                let entity = entity.into();
                let raw = raw.as_ref();
                parse_date(raw)
                    .map(|pivot| Event::new(entity.clone(), pivot))
                    .ok_or_else(|| RegistryError::InvalidDate {
                        entity,
                        value: raw.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(events)
    }

    /// The built-in tour table.
    pub fn default_tour() -> Self {
        let events = DEFAULT_TOUR
            .iter()
            .filter_map(|(city, raw)| parse_date(raw).map(|d| Event::new(*city, d)))
            .collect();
        // The literal table has no duplicates.
        Self::new(events).unwrap_or_default()
    }

    /// Pivot date for `entity`.
    pub fn lookup(&self, entity: &str) -> Result<NaiveDate, RegistryError> {
        self.event(entity).map(|e| e.pivot)
    }

    pub fn event(&self, entity: &str) -> Result<&Event, RegistryError> {
        self.index
            .get(entity)
            .map(|&i| &self.events[i])
            .ok_or_else(|| RegistryError::UnknownEntity(entity.to_string()))
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.index.contains_key(entity)
    }

    /// Registered cities in registration order.
    pub fn entities(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.entity.as_str()).collect()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
