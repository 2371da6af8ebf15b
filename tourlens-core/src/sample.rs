//! Synthetic streaming data for demos and tests.
//!
//! Produces one daily series per registered city: noise around a baseline,
//! a lift that starts on the concert date and fades over a few weeks, and a
//! sprinkling of missing cells. Seeded, so the same spec gives the same table.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{ObservationStore, StoreError};
use crate::registry::EventRegistry;

/// Parameters for `generate`.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seed: u64,
    /// Mean daily value before any event.
    pub baseline: f64,
    /// Daily noise standard deviation.
    pub noise: f64,
    /// Added to the value on the concert date.
    pub lift: f64,
    /// Days for the lift to halve.
    pub half_life_days: f64,
    /// Probability that a cell is left empty.
    pub missing_rate: f64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MIN),
            seed: 42,
            baseline: 2.0,
            noise: 0.8,
            lift: 6.0,
            half_life_days: 7.0,
            missing_rate: 0.03,
        }
    }
}

/// Build a store with one column per registered city.
pub fn generate(registry: &EventRegistry, spec: &SampleSpec) -> Result<ObservationStore, StoreError> {
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let mut dates = Vec::new();
    let mut day = spec.start;
    while day <= spec.end {
        dates.push(day);
        day += Duration::days(1);
    }

    let decay = std::f64::consts::LN_2 / spec.half_life_days.max(f64::EPSILON);
    let series = registry
        .events()
        .iter()
        .map(|event| {
            // Per-city scale so the bar chart is not flat.
            let scale = rng.gen_range(0.5..1.5);
            let values = dates
                .iter()
                .map(|&date| {
                    if rng.gen::<f64>() < spec.missing_rate {
                        return None;
                    }
                    let offset = (date - event.pivot).num_days();
                    let bump = if offset >= 0 {
                        spec.lift * scale * (-decay * offset as f64).exp()
                    } else {
                        0.0
                    };
                    let value = spec.baseline + bump + spec.noise * standard_normal(&mut rng);
                    Some((value * 1e4).round() / 1e4)
                })
                .collect();
            (event.entity.clone(), values)
        })
        .collect();

    ObservationStore::from_series(dates, series)
}

/// Box–Muller draw from N(0, 1).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
