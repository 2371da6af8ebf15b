//! Window comparator — pre/post statistics around one pivot date.

use chrono::{Days, NaiveDate};

use super::settings::CompareSettings;
use crate::domain::{ComparisonResult, Coverage, Verdict, Window};
use crate::stats::{describe, welch_t_test};

/// Inclusive window bounds `[pivot - half_width, pivot + half_width]`.
///
/// Saturates at the calendar limits instead of overflowing.
pub fn window_bounds(pivot: NaiveDate, half_width_days: i64) -> (NaiveDate, NaiveDate) {
    let span = Days::new(half_width_days.max(0).unsigned_abs());
    let start = pivot.checked_sub_days(span).unwrap_or(NaiveDate::MIN);
    let end = pivot.checked_add_days(span).unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// `(post - pre) / |pre| * 100`, or `None` when `pre` is exactly zero.
pub fn percent_change(pre_mean: f64, post_mean: f64) -> Option<f64> {
    if pre_mean == 0.0 {
        return None;
    }
    let change = (post_mean - pre_mean) / pre_mean.abs() * 100.0;
    change.is_finite().then_some(change)
}

/// Compare the observations before `pivot` with those on or after it.
///
/// Never fails. Missing sides show up as `None` statistics plus the
/// `coverage` marker.
pub fn compare(window: &Window, pivot: NaiveDate, settings: &CompareSettings) -> ComparisonResult {
    let partition = window.partition(pivot);
    let pre = describe(&partition.pre_values());
    let post = describe(&partition.post_values());
    let coverage = Coverage::from_counts(partition.pre.len(), partition.post.len());

    let (percent, welch) = match (&pre, &post) {
        (Some(pre), Some(post)) => {
            let welch = if settings.welch_test {
                welch_t_test(pre, post)
            } else {
                None
            };
            (percent_change(pre.mean, post.mean), welch)
        }
        _ => (None, None),
    };

    let verdict = welch.map(|w| {
        if w.is_significant(settings.alpha) {
            Verdict::Significant
        } else {
            Verdict::NotSignificant
        }
    });

    let baseline_near_zero = percent.is_some()
        && pre
            .map(|s| s.mean.abs() < settings.near_zero_baseline)
            .unwrap_or(false);

    ComparisonResult {
        entity: window.entity.clone(),
        pivot,
        window_start: window.start,
        window_end: window.end,
        coverage,
        pre,
        post,
        percent_change: percent,
        welch,
        verdict,
        baseline_near_zero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MAX_HALF_WIDTH_DAYS;
    use crate::domain::Point;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn pivot() -> NaiveDate {
        d(2024, 6, 3)
    }

    /// Points at `offset` days from the pivot.
    fn window(points: &[(i64, f64)]) -> Window {
        let (start, end) = window_bounds(pivot(), 30);
        let points = points
            .iter()
            .map(|&(offset, v)| Point::new(pivot() + Duration::days(offset), v))
            .collect();
        Window::new("Paris", start, end, points)
    }

    #[test]
    fn bounds_are_symmetric() {
        let (start, end) = window_bounds(pivot(), 30);
        assert_eq!(start, d(2024, 5, 4));
        assert_eq!(end, d(2024, 7, 3));
    }

    #[test]
    fn negative_half_width_collapses_to_pivot() {
        assert_eq!(window_bounds(pivot(), -5), (pivot(), pivot()));
    }

    #[test]
    fn huge_half_width_saturates_at_calendar_limits() {
        let full = (NaiveDate::MIN, NaiveDate::MAX);
        assert_eq!(window_bounds(pivot(), 1_000_000_000_000), full);
        assert_eq!(window_bounds(pivot(), i64::MAX), full);

        let (start, end) = window_bounds(pivot(), MAX_HALF_WIDTH_DAYS);
        assert_eq!((pivot() - start).num_days(), MAX_HALF_WIDTH_DAYS);
        assert_eq!((end - pivot()).num_days(), MAX_HALF_WIDTH_DAYS);
    }

    #[test]
    fn percent_change_basic() {
        assert!((percent_change(5.0, 8.0).unwrap() - 60.0).abs() < 1e-12);
        assert!((percent_change(-2.0, -1.0).unwrap() - 50.0).abs() < 1e-12);
        assert!((percent_change(-2.0, -3.0).unwrap() + 50.0).abs() < 1e-12);
        assert_eq!(percent_change(0.0, 3.0), None);
    }

    #[test]
    fn empty_window_reports_no_data() {
        let r = compare(&window(&[]), pivot(), &CompareSettings::default());
        assert_eq!(r.coverage, Coverage::NoData);
        assert!(r.pre.is_none() && r.post.is_none());
        assert!(r.percent_change.is_none());
        assert!(r.welch.is_none());
        assert!(r.verdict.is_none());
        assert!(!r.has_data());
    }

    #[test]
    fn missing_post_skips_change_and_test() {
        let r = compare(
            &window(&[(-3, 1.0), (-2, 2.0), (-1, 3.0)]),
            pivot(),
            &CompareSettings::default(),
        );
        assert_eq!(r.coverage, Coverage::MissingPost);
        assert!(r.pre.is_some());
        assert!(r.post.is_none());
        assert!(r.percent_change.is_none());
        assert!(r.welch.is_none());
    }

    #[test]
    fn pivot_day_counts_as_post() {
        let r = compare(
            &window(&[(-1, 1.0), (0, 9.0)]),
            pivot(),
            &CompareSettings::default(),
        );
        assert_eq!(r.pre.unwrap().count, 1);
        assert_eq!(r.post.unwrap().count, 1);
        assert_eq!(r.post_mean(), Some(9.0));
    }

    #[test]
    fn single_pre_observation() {
        let mut pts = vec![(-5, 2.0)];
        pts.extend((0..10).map(|i| (i, 3.0 + i as f64 * 0.1)));
        let r = compare(&window(&pts), pivot(), &CompareSettings::default());

        assert!(r.pre.unwrap().std_dev.is_none());
        assert!(r.post.unwrap().std_dev.is_some());
        assert!(r.percent_change.is_some());
        // One observation has no variance, so no test either.
        assert!(r.welch.is_none());
        assert!(r.verdict.is_none());
    }

    #[test]
    fn zero_baseline_has_no_percent_change() {
        let r = compare(
            &window(&[(-2, -1.0), (-1, 1.0), (1, 4.0), (2, 6.0)]),
            pivot(),
            &CompareSettings::default(),
        );
        assert_eq!(r.pre_mean(), Some(0.0));
        assert!(r.percent_change.is_none());
        assert!(!r.baseline_near_zero);
        assert_eq!(r.coverage, Coverage::Complete);
    }

    #[test]
    fn small_baseline_is_flagged_but_reported() {
        let r = compare(
            &window(&[(-2, 0.04), (-1, 0.06), (1, 1.0), (2, 1.2)]),
            pivot(),
            &CompareSettings::default(),
        );
        assert!(r.percent_change.unwrap() > 1000.0);
        assert!(r.baseline_near_zero);
    }

    #[test]
    fn welch_can_be_disabled() {
        let pts = [(-2, 1.0), (-1, 2.0), (1, 5.0), (2, 6.0)];
        let on = compare(&window(&pts), pivot(), &CompareSettings::default());
        let off = compare(
            &window(&pts),
            pivot(),
            &CompareSettings::default().without_welch_test(),
        );
        assert!(on.welch.is_some());
        assert!(off.welch.is_none());
        assert_eq!(on.percent_change, off.percent_change);
    }

    #[test]
    fn strong_shift_is_significant() {
        let mut pts: Vec<(i64, f64)> = (1..=15).map(|i| (-i, 1.0 + (i % 3) as f64 * 0.1)).collect();
        pts.extend((0..15).map(|i| (i, 6.0 + (i % 3) as f64 * 0.1)));
        let r = compare(&window(&pts), pivot(), &CompareSettings::default());
        assert_eq!(r.verdict, Some(Verdict::Significant));
        assert!(r.is_significant());
        assert!(r.t_statistic().unwrap() > 0.0);
    }
}
