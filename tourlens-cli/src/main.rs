//! TourLens CLI — event-window comparisons from the terminal.
//!
//! Commands:
//! - `cities` — registered events and data coverage per city
//! - `compare` — pre/post statistics and Welch test for one city
//! - `rank` — percent change across cities, with a text bar per city
//! - `export` — write results as CSV, JSON or Markdown
//! - `sample` — write a synthetic demo table

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tourlens_core::sample::{generate, SampleSpec};
use tourlens_core::{ComparisonResult, EntityComparison, MultiComparison, MAX_HALF_WIDTH_DAYS};
use tourlens_runner::display::{opt, p_value, percent, truncate};
use tourlens_runner::{
    export_window_csv, sort_results, text_bar, write_export, ExportBundle, ExportFormat,
    RunnerConfig, Session, SortKey,
};

#[derive(Parser)]
#[command(
    name = "tourlens",
    version,
    about = "TourLens CLI — streaming metrics around concert dates"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./tourlens.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Observation CSV. Overrides `[data] path` from the config.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Days either side of the event. Overrides `[window] half_width_days`.
    #[arg(long, global = true, value_parser = clap::value_parser!(i64).range(0..=MAX_HALF_WIDTH_DAYS))]
    half_width: Option<i64>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered events and whether the data covers them.
    Cities,
    /// Pre/post statistics for one city.
    Compare {
        /// City name, as registered.
        city: String,

        /// Also print every observation in the window.
        #[arg(long, default_value_t = false)]
        show_data: bool,

        /// Print the result as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Percent change across cities. No cities means every registered city.
    Rank {
        cities: Vec<String>,

        /// Sort order: input, change, p-value.
        #[arg(long, default_value = "input")]
        sort: SortKey,
    },
    /// Export results to a file.
    Export {
        cities: Vec<String>,

        /// csv, json or markdown.
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Defaults to tourlens-results with the format's extension.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Sort order: input, change, p-value.
        #[arg(long, default_value = "input")]
        sort: SortKey,
    },
    /// Write a synthetic table with a post-event lift for every city.
    Sample {
        #[arg(long)]
        output: PathBuf,

        /// RNG seed.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = RunnerConfig::discover(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    if let Some(days) = cli.half_width {
        config.window.half_width_days = days;
    }

    match cli.command {
        Commands::Cities => run_cities(&open_session(&config)?),
        Commands::Compare {
            city,
            show_data,
            json,
        } => run_compare(&open_session(&config)?, &city, show_data, json),
        Commands::Rank { cities, sort } => run_rank(&open_session(&config)?, &cities, sort),
        Commands::Export {
            cities,
            format,
            output,
            sort,
        } => run_export(&open_session(&config)?, &cities, format, output, sort),
        Commands::Sample { output, seed } => run_sample(&config, output, seed),
    }
}

fn open_session(config: &RunnerConfig) -> Result<Session> {
    Session::open(config)
        .with_context(|| format!("failed to open {}", config.data.path.display()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn run_cities(session: &Session) -> Result<()> {
    let status = session.city_status();
    if status.is_empty() {
        println!("No events registered.");
        return Ok(());
    }

    println!("Data: {}", session.source().display());
    if let Some((first, last)) = session.store.date_range() {
        println!("Dates: {first} to {last} ({} rows)", session.store.row_count());
    }
    println!("Window: ±{} days", session.settings.half_width_days);
    println!();
    println!("{:<16} {:<12} {:<8} {:>8}", "City", "Event", "Column", "In Win");
    println!("{}", "-".repeat(47));
    for s in &status {
        println!(
            "{:<16} {:<12} {:<8} {:>8}",
            truncate(&s.entity, 16),
            s.pivot,
            if s.has_column { "yes" } else { "MISSING" },
            s.window_observations
        );
    }
    Ok(())
}

fn run_compare(session: &Session, city: &str, show_data: bool, json: bool) -> Result<()> {
    let cmp = session.compare_entity(city)?;

    if json {
        let value = if show_data {
            serde_json::json!({ "result": cmp.result, "points": cmp.window.points() })
        } else {
            serde_json::to_value(&cmp.result)?
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_comparison(&cmp, session.settings.alpha);
    if show_data {
        print!("{}", export_window_csv(&cmp.window, cmp.event.pivot)?);
    }
    Ok(())
}

fn print_comparison(cmp: &EntityComparison, alpha: f64) {
    let r = &cmp.result;
    println!();
    println!("=== {} ===", r.entity);
    println!("Event:          {}", r.pivot);
    println!("Window:         {} to {}", r.window_start, r.window_end);
    println!("Observations:   {} ({})", r.observation_count(), r.coverage.label());
    println!();
    println!("{:<10} {:>5} {:>10} {:>10} {:>10} {:>10}", "", "n", "Mean", "Std Dev", "Min", "Max");
    println!("{}", "-".repeat(60));
    for (label, stats) in [("Before", r.pre), ("After", r.post)] {
        println!(
            "{:<10} {:>5} {:>10} {:>10} {:>10} {:>10}",
            label,
            stats.map_or(0, |s| s.count),
            opt(stats.map(|s| s.mean), 3),
            opt(stats.and_then(|s| s.std_dev), 3),
            opt(stats.map(|s| s.min), 3),
            opt(stats.map(|s| s.max), 3),
        );
    }
    println!();
    println!("Change:         {}", percent(r.percent_change));
    if r.baseline_near_zero {
        println!("WARNING: pre-event mean is close to zero; the percent change is unstable");
    }
    match r.welch {
        Some(w) => {
            println!("t statistic:    {:.4}", w.t_statistic);
            println!("df:             {:.2}", w.df);
            println!("p-value:        {}", p_value(Some(w.p_value)));
            if let Some(v) = r.verdict {
                println!("Verdict:        {} at alpha {alpha}", v.label());
            }
        }
        None => println!("Welch t-test:   n/a (needs two observations each side)"),
    }
    println!();
}

const BAR_WIDTH: usize = 30;

fn run_rank(session: &Session, cities: &[String], sort: SortKey) -> Result<()> {
    let mut out = session.compare_selection(cities);
    sort_results(&mut out.results, sort);
    print_ranking(&out);
    Ok(())
}

fn print_ranking(out: &MultiComparison) {
    if out.is_empty() {
        println!("No city has data on both sides of its event.");
    } else {
        let max_abs = out
            .results
            .iter()
            .filter_map(|r| r.percent_change)
            .fold(0.0_f64, |m, v| m.max(v.abs()));

        println!(
            "{:<16} {:<12} {:>10} {:>10} {:>3}  Bar",
            "City", "Event", "Change", "p-value", ""
        );
        println!("{}", "-".repeat(56 + BAR_WIDTH));
        for r in &out.results {
            println!(
                "{:<16} {:<12} {:>10} {:>10} {:>3}  {}",
                truncate(&r.entity, 16),
                r.pivot,
                percent(r.percent_change),
                p_value(r.p_value()),
                marker(r),
                text_bar(r.percent_change.unwrap_or(0.0), max_abs, BAR_WIDTH)
            );
        }
        if out.results.iter().any(|r| r.baseline_near_zero) {
            println!();
            println!("! pre-event mean close to zero; change is unstable");
        }
    }

    if !out.skipped.is_empty() {
        println!();
        println!("Skipped:");
        for s in &out.skipped {
            println!("  {} ({})", s.entity, s.reason.label());
        }
    }
}

/// `*` significant, `!` near-zero baseline.
fn marker(r: &ComparisonResult) -> &'static str {
    match (r.is_significant(), r.baseline_near_zero) {
        (true, true) => "*!",
        (true, false) => "*",
        (false, true) => "!",
        (false, false) => "",
    }
}

fn run_export(
    session: &Session,
    cities: &[String],
    format: ExportFormat,
    output: Option<PathBuf>,
    sort: SortKey,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_export_path(format));
    let mut out = session.compare_selection(cities);
    sort_results(&mut out.results, sort);
    let (kept, skipped) = (out.results.len(), out.skipped.len());

    let bundle = ExportBundle::new(session, out);
    write_export(&bundle, format, &output)?;
    println!(
        "Exported {kept} result(s), {skipped} skipped, to {}",
        output.display()
    );
    Ok(())
}

fn default_export_path(format: ExportFormat) -> PathBuf {
    PathBuf::from(format!("tourlens-results.{}", format.extension()))
}

fn run_sample(config: &RunnerConfig, output: PathBuf, seed: Option<u64>) -> Result<()> {
    let registry = config.registry()?;
    if registry.is_empty() {
        bail!("no events registered; nothing to generate");
    }
    let mut spec = SampleSpec::default();
    if let Some(seed) = seed {
        spec.seed = seed;
    }

    let store = generate(&registry, &spec)?;
    let file = std::fs::File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    store.write_csv(file, &config.data.date_column)?;

    println!(
        "Wrote {} days x {} cities to {}",
        store.row_count(),
        store.columns().len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rank_with_sort() {
        let cli = Cli::try_parse_from(["tourlens", "rank", "Paris", "Tokyo", "--sort", "p-value"])
            .unwrap();
        match cli.command {
            Commands::Rank { cities, sort } => {
                assert_eq!(cities, vec!["Paris", "Tokyo"]);
                assert_eq!(sort, SortKey::PValue);
            }
            _ => panic!("expected rank"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tourlens", "compare", "Paris", "--half-width", "7", "-vv"])
            .unwrap();
        assert_eq!(cli.half_width, Some(7));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_negative_half_width() {
        assert!(Cli::try_parse_from(["tourlens", "cities", "--half-width", "-3"]).is_err());
    }

    #[test]
    fn rejects_half_width_beyond_cap() {
        let at_cap = MAX_HALF_WIDTH_DAYS.to_string();
        assert!(Cli::try_parse_from(["tourlens", "cities", "--half-width", &at_cap]).is_ok());
        let over = (MAX_HALF_WIDTH_DAYS + 1).to_string();
        assert!(Cli::try_parse_from(["tourlens", "cities", "--half-width", &over]).is_err());
        assert!(
            Cli::try_parse_from(["tourlens", "compare", "Paris", "--half-width", "1000000000000"])
                .is_err()
        );
    }

    #[test]
    fn export_output_defaults_to_format_extension() {
        let cli = Cli::try_parse_from(["tourlens", "export", "Paris", "--format", "markdown"])
            .unwrap();
        match cli.command {
            Commands::Export { format, output, .. } => {
                assert_eq!(output, None);
                assert_eq!(default_export_path(format), PathBuf::from("tourlens-results.md"));
            }
            _ => panic!("expected export"),
        }
        assert_eq!(
            default_export_path(ExportFormat::Json),
            PathBuf::from("tourlens-results.json")
        );
    }

    #[test]
    fn rejects_unknown_export_format() {
        assert!(
            Cli::try_parse_from(["tourlens", "export", "--format", "xlsx", "--output", "x"])
                .is_err()
        );
    }
}
