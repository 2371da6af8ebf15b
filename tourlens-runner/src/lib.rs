//! TourLens Runner — session loading, configuration, ranking, export.
//!
//! This crate builds on `tourlens-core` to provide:
//! - TOML configuration (data source, window settings, event table)
//! - A session that loads the observation table once and answers queries
//! - Ranking helpers for the multi-city view
//! - CSV / JSON / Markdown export of comparison results
//! - Shared "n/a"-aware formatting for undefined statistics

pub mod config;
pub mod display;
pub mod export;
pub mod ranking;
pub mod session;

pub use config::{ConfigError, DataConfig, RunnerConfig, DEFAULT_CONFIG_FILE};
pub use export::{
    export_csv, export_json, export_markdown, export_window_csv, import_json, write_export,
    ExportBundle, ExportFormat, SCHEMA_VERSION,
};
pub use ranking::{bar_entries, sort_results, text_bar, BarEntry, SortKey};
pub use session::{CityStatus, Session, SessionError};
