//! Text formatting shared by the CLI, TUI and Markdown export.
//!
//! Undefined statistics render as `n/a`, never as 0 or NaN.

pub const NOT_AVAILABLE: &str = "n/a";

/// Fixed-precision number or `n/a`.
pub fn opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Signed percentage, e.g. `+60.00%`.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// p-value with four decimals, switching to scientific below 1e-4.
pub fn p_value(value: Option<f64>) -> String {
    match value {
        Some(p) if p.is_finite() && p > 0.0 && p < 1e-4 => format!("{p:.2e}"),
        Some(p) if p.is_finite() => format!("{p:.4}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Truncate to `max` chars, ending in `~` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max == 0 {
        String::new()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('~');
        out
    }
}
