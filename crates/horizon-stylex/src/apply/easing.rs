//! Easing functions for value transitions.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a
//! transformed value that creates smoother, more natural-looking motion.
//! They are used both by the physical interpolation path and, by name, in
//! the native `transition` shorthand the applier writes.

use std::f64::consts::PI;

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    EaseInOut,
    /// Cubic ease-in (more pronounced than quadratic).
    EaseInCubic,
    /// Cubic ease-out (more pronounced than quadratic).
    EaseOutCubic,
    /// Cubic ease-in-out (more pronounced than quadratic).
    EaseInOutCubic,
    /// Sinusoidal ease-in.
    EaseInSine,
    /// Sinusoidal ease-out.
    EaseOutSine,
    /// Sinusoidal ease-in-out.
    EaseInOutSine,
}

impl Easing {
    /// Parse a CSS timing-function keyword.
    pub fn from_css(name: &str) -> Option<Self> {
        match name.trim() {
            "linear" => Some(Self::Linear),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease" | "ease-in-out" => Some(Self::EaseInOut),
            _ => None,
        }
    }

    /// The closest standard CSS timing-function keyword, for use in the
    /// native `transition` shorthand.
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn | Self::EaseInCubic | Self::EaseInSine => "ease-in",
            Self::EaseOut | Self::EaseOutCubic | Self::EaseOutSine => "ease-out",
            Self::EaseInOut | Self::EaseInOutCubic | Self::EaseInOutSine => "ease-in-out",
        }
    }
}

/// Apply an easing function to a progress value.
///
/// The input is clamped to 0.0..=1.0.
#[inline]
pub fn ease(easing: Easing, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => ease_in_quad(t),
        Easing::EaseOut => ease_out_quad(t),
        Easing::EaseInOut => ease_in_out_quad(t),
        Easing::EaseInCubic => ease_in_cubic(t),
        Easing::EaseOutCubic => ease_out_cubic(t),
        Easing::EaseInOutCubic => ease_in_out_cubic(t),
        Easing::EaseInSine => ease_in_sine(t),
        Easing::EaseOutSine => ease_out_sine(t),
        Easing::EaseInOutSine => ease_in_out_sine(t),
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f64, end: f64, t: f64) -> f64 {
    let eased_t = ease(easing, t);
    start + (end - start) * eased_t
}

#[inline]
fn ease_in_quad(t: f64) -> f64 {
    t * t
}

#[inline]
fn ease_out_quad(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[inline]
fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

#[inline]
fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[inline]
fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[inline]
fn ease_in_sine(t: f64) -> f64 {
    1.0 - ((t * PI) / 2.0).cos()
}

#[inline]
fn ease_out_sine(t: f64) -> f64 {
    ((t * PI) / 2.0).sin()
}

#[inline]
fn ease_in_out_sine(t: f64) -> f64 {
    -((PI * t).cos() - 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        assert_eq!(ease(Easing::Linear, 0.0), 0.0);
        assert_eq!(ease(Easing::Linear, 0.5), 0.5);
        assert_eq!(ease(Easing::Linear, 1.0), 1.0);
    }

    #[test]
    fn ease_in_starts_slow() {
        assert_eq!(ease(Easing::EaseIn, 0.0), 0.0);
        assert!(ease(Easing::EaseIn, 0.5) < 0.5);
        assert_eq!(ease(Easing::EaseIn, 1.0), 1.0);
    }

    #[test]
    fn ease_out_starts_fast() {
        assert!(ease(Easing::EaseOut, 0.5) > 0.5);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(ease(Easing::Linear, -0.5), 0.0);
        assert_eq!(ease(Easing::Linear, 1.5), 1.0);
    }

    #[test]
    fn lerp_eased_spans_range() {
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 1.0), 200.0);
    }

    #[test]
    fn css_names_round_trip() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(Easing::from_css(easing.css_name()), Some(easing));
        }
        assert_eq!(Easing::from_css("ease"), Some(Easing::EaseInOut));
        assert_eq!(Easing::from_css("bouncy"), None);
    }
}
