//! Export — JSON, CSV, and Markdown renditions of comparison results.
//!
//! - **JSON**: results plus skipped cities plus provenance (source file,
//!   data fingerprint, settings), schema-versioned
//! - **CSV**: one row per result, undefined statistics left blank
//! - **Markdown**: a summary table for pasting into notes
//!
//! Unknown schema versions are rejected on import.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tourlens_core::stats::PartitionStats;
use tourlens_core::{CompareSettings, ComparisonResult, MultiComparison, SkippedEntity, Window};

use crate::display;
use crate::session::Session;

pub const SCHEMA_VERSION: u32 = 1;

/// Everything a JSON export carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub schema_version: u32,
    pub source: PathBuf,
    /// blake3 hex digest of the loaded table.
    pub data_fingerprint: String,
    pub settings: CompareSettings,
    pub results: Vec<ComparisonResult>,
    pub skipped: Vec<SkippedEntity>,
}

impl ExportBundle {
    pub fn new(session: &Session, multi: MultiComparison) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            source: session.source().to_path_buf(),
            data_fingerprint: session.store.fingerprint(),
            settings: session.settings,
            results: multi.results,
            skipped: multi.skipped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(format!(
                "unknown export format '{other}' (expected csv, json or markdown)"
            )),
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(bundle: &ExportBundle) -> Result<String> {
    serde_json::to_string_pretty(bundle).context("failed to serialize export bundle to JSON")
}

/// Deserialize an export bundle, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ExportBundle> {
    let bundle: ExportBundle =
        serde_json::from_str(json).context("failed to deserialize export bundle from JSON")?;
    if bundle.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            bundle.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(bundle)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn cell(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => String::new(),
    }
}

fn stats_cells(stats: Option<PartitionStats>) -> [String; 5] {
    [
        stats.map(|s| s.count.to_string()).unwrap_or_else(|| "0".into()),
        cell(stats.map(|s| s.mean), 6),
        cell(stats.and_then(|s| s.std_dev), 6),
        cell(stats.map(|s| s.min), 6),
        cell(stats.map(|s| s.max), 6),
    ]
}

/// One row per result.
///
/// Columns: entity, pivot, window_start, window_end, coverage, pre_count,
/// pre_mean, pre_std_dev, pre_min, pre_max, post_count, post_mean,
/// post_std_dev, post_min, post_max, percent_change, t_statistic, df,
/// p_value, verdict, baseline_near_zero
pub fn export_csv(results: &[ComparisonResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "entity",
        "pivot",
        "window_start",
        "window_end",
        "coverage",
        "pre_count",
        "pre_mean",
        "pre_std_dev",
        "pre_min",
        "pre_max",
        "post_count",
        "post_mean",
        "post_std_dev",
        "post_min",
        "post_max",
        "percent_change",
        "t_statistic",
        "df",
        "p_value",
        "verdict",
        "baseline_near_zero",
    ])?;

    for r in results {
        let mut row = vec![
            r.entity.clone(),
            r.pivot.to_string(),
            r.window_start.to_string(),
            r.window_end.to_string(),
            r.coverage.label().to_string(),
        ];
        row.extend(stats_cells(r.pre));
        row.extend(stats_cells(r.post));
        row.push(cell(r.percent_change, 4));
        row.push(cell(r.t_statistic(), 6));
        row.push(cell(r.welch.map(|w| w.df), 4));
        row.push(cell(r.p_value(), 6));
        row.push(r.verdict.map(|v| v.label().to_string()).unwrap_or_default());
        row.push(r.baseline_near_zero.to_string());
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// The raw observations of one window, with each row's side of the pivot.
pub fn export_window_csv(window: &Window, pivot: chrono::NaiveDate) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "offset_days", "side", window.entity.as_str()])?;
    for p in window.points() {
        let side = if p.date < pivot { "pre" } else { "post" };
        wtr.write_record([
            p.date.to_string(),
            (p.date - pivot).num_days().to_string(),
            side.to_string(),
            p.value.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

pub fn export_markdown(bundle: &ExportBundle) -> String {
    let mut md = String::with_capacity(2048);
    let s = &bundle.settings;

    md.push_str("# Event Window Comparison\n\n");

    md.push_str("## Settings\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Source | {} |\n", bundle.source.display()));
    md.push_str(&format!("| Window | ±{} days |\n", s.half_width_days));
    if s.welch_test {
        md.push_str(&format!("| Welch t-test | alpha = {} |\n", s.alpha));
    } else {
        md.push_str("| Welch t-test | off |\n");
    }
    md.push_str(&format!("| Data Hash | {} |\n", bundle.data_fingerprint));
    md.push('\n');

    md.push_str("## Results\n\n");
    if bundle.results.is_empty() {
        md.push_str("_No city has data on both sides of its event._\n\n");
    } else {
        md.push_str(
            "| City | Event | Pre n | Pre Mean | Pre SD | Post n | Post Mean | Post SD | Change | t | p | Verdict |\n",
        );
        md.push_str("| --- | --- | ---: | ---: | ---: | ---: | ---: | ---: | ---: | ---: | ---: | --- |\n");
        for r in &bundle.results {
            let mut change = display::percent(r.percent_change);
            if r.baseline_near_zero {
                change.push_str(" ⚠");
            }
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                r.entity,
                r.pivot,
                r.pre.map_or(0, |p| p.count),
                display::opt(r.pre_mean(), 2),
                display::opt(r.pre.and_then(|p| p.std_dev), 2),
                r.post.map_or(0, |p| p.count),
                display::opt(r.post_mean(), 2),
                display::opt(r.post.and_then(|p| p.std_dev), 2),
                change,
                display::opt(r.t_statistic(), 3),
                display::p_value(r.p_value()),
                r.verdict.map_or(display::NOT_AVAILABLE, |v| v.label()),
            ));
        }
        md.push('\n');
        if bundle.results.iter().any(|r| r.baseline_near_zero) {
            md.push_str("⚠ pre-event mean is close to zero; the percent change is unstable.\n\n");
        }
    }

    if !bundle.skipped.is_empty() {
        md.push_str("## Skipped\n\n");
        for skip in &bundle.skipped {
            md.push_str(&format!("- {}: {}\n", skip.entity, skip.reason.label()));
        }
        md.push('\n');
    }

    md
}

// ─── Files ──────────────────────────────────────────────────────────

/// Render `bundle` in `format` and write it to `path`.
pub fn write_export(bundle: &ExportBundle, format: ExportFormat, path: &Path) -> Result<()> {
    let text = match format {
        ExportFormat::Csv => export_csv(&bundle.results)?,
        ExportFormat::Json => export_json(bundle)?,
        ExportFormat::Markdown => export_markdown(bundle),
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export dir: {}", dir.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
