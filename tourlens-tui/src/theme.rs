//! Neon-on-charcoal palette and the style helpers panels draw with.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, highlights, post-event series)
//! - **Positive**: Neon green (lift after the event)
//! - **Negative**: Hot pink (drop after the event, errors)
//! - **Warning**: Neon orange (pivot marker, unstable baselines)
//! - **Neutral**: Cool purple (pre-event series, section labels)
//! - **Muted**: Steel blue (secondary text)

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: BACKGROUND,
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
        }
    }

    /// Green for a lift, pink for a drop, muted when undefined.
    pub fn change_color(&self, change: Option<f64>) -> Color {
        match change {
            Some(c) if c >= 0.0 => self.positive,
            Some(_) => self.negative,
            None => self.muted,
        }
    }

    /// Brighter the smaller the p-value.
    pub fn p_value_color(&self, p: Option<f64>, alpha: f64) -> Color {
        match p {
            Some(p) if p < alpha / 10.0 => self.positive,
            Some(p) if p < alpha => self.accent,
            Some(_) => self.neutral,
            None => self.muted,
        }
    }
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn change(value: Option<f64>) -> Style {
    Style::default().fg(Theme::default().change_color(value))
}

pub fn cursor() -> Style {
    accent().add_modifier(Modifier::REVERSED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_color_by_sign() {
        let theme = Theme::default();
        assert_eq!(theme.change_color(Some(60.0)), theme.positive);
        assert_eq!(theme.change_color(Some(0.0)), theme.positive);
        assert_eq!(theme.change_color(Some(-5.0)), theme.negative);
        assert_eq!(theme.change_color(None), theme.muted);
    }

    #[test]
    fn p_value_color_steps() {
        let theme = Theme::default();
        assert_eq!(theme.p_value_color(Some(0.001), 0.05), theme.positive);
        assert_eq!(theme.p_value_color(Some(0.02), 0.05), theme.accent);
        assert_eq!(theme.p_value_color(Some(0.4), 0.05), theme.neutral);
        assert_eq!(theme.p_value_color(None, 0.05), theme.muted);
    }
}
