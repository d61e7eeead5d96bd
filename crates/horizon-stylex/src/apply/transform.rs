//! Transform sub-function bookkeeping.
//!
//! A `transform-<fn>` property key is never written to the `transform`
//! declaration directly. Each sub-function's value lives in its own custom
//! property (`--transform-translateX: 10px`), and the `transform`
//! declaration references them:
//!
//! ```text
//! transform: translateX(var(--transform-translateX)) scale(var(--transform-scale))
//! ```
//!
//! Sub-functions keep their first-seen order across evaluations, so only a
//! membership change re-renders the declaration; value updates (including
//! every animation frame) touch one custom property.

use crate::TRANSFORM_VAR_PREFIX;

/// Key prefix marking a transform sub-function property.
const KEY_PREFIX: &str = "transform-";

/// Whether a property key addresses a transform sub-function.
pub fn is_transform_property(property: &str) -> bool {
    property.starts_with(KEY_PREFIX)
}

/// The CSS function name for a `transform-<fn>` key:
/// `transform-translate-x` becomes `translateX`. Camel-casing uppercases
/// the letter after a digit word, so the `3D` → `3d` fix keeps the 3-d
/// variants in CSS casing (`rotate-3d` → `rotate3d`).
pub fn css_function_name(property: &str) -> String {
    let kebab = property.strip_prefix(KEY_PREFIX).unwrap_or(property);
    camel_case(kebab).replace("3D", "3d")
}

/// The custom property a sub-function's value is indirected through.
pub fn custom_property_name(function: &str) -> String {
    format!("{TRANSFORM_VAR_PREFIX}{function}")
}

/// Default numeric value when the current side of an interpolation is
/// absent: scale-like functions rest at 1, everything else at 0.
pub fn default_scalar(function: &str) -> f64 {
    if function.starts_with("scale") { 1.0 } else { 0.0 }
}

fn camel_case(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len());
    for (index, word) in kebab.split('-').filter(|w| !w.is_empty()).enumerate() {
        if index == 0 {
            out.push_str(word);
            continue;
        }
        let mut capitalized = false;
        for ch in word.chars() {
            if !capitalized && ch.is_ascii_alphabetic() {
                out.extend(ch.to_uppercase());
                capitalized = true;
            } else {
                out.push(ch);
            }
        }
    }
    out
}

/// Parse a value as `(number, unit)`, e.g. `"10px"` → `(10.0, "px")` or
/// `"2"` → `(2.0, "")`. Multi-component values fail.
pub fn parse_scalar(text: &str) -> Option<(f64, String)> {
    let text = text.trim();
    let numeric_len = text
        .char_indices()
        .take_while(|(index, ch)| {
            ch.is_ascii_digit() || *ch == '.' || (*index == 0 && (*ch == '-' || *ch == '+'))
        })
        .count();
    let (number, unit) = text.split_at(
        text.char_indices()
            .nth(numeric_len)
            .map_or(text.len(), |(byte, _)| byte),
    );
    let value: f64 = number.parse().ok()?;
    if !unit.chars().all(|ch| ch.is_ascii_alphabetic() || ch == '%') {
        return None;
    }
    Some((value, unit.to_string()))
}

/// Render a number with its unit, without a trailing `.0`.
pub fn format_scalar(value: f64, unit: &str) -> String {
    if value.fract() == 0.0 {
        format!("{}{unit}", value as i64)
    } else {
        format!("{value}{unit}")
    }
}

/// Per-element list of live transform sub-functions, in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct TransformList {
    functions: Vec<String>,
}

impl TransformList {
    /// Ensure a sub-function is present. Returns whether membership
    /// changed.
    pub fn upsert(&mut self, function: &str) -> bool {
        if self.functions.iter().any(|f| f == function) {
            false
        } else {
            self.functions.push(function.to_string());
            true
        }
    }

    /// Drop a sub-function. Returns whether it was present.
    pub fn remove(&mut self, function: &str) -> bool {
        let before = self.functions.len();
        self.functions.retain(|f| f != function);
        self.functions.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// The aggregate `transform` declaration text.
    pub fn render(&self) -> String {
        self.functions
            .iter()
            .map(|function| format!("{function}(var({}))", custom_property_name(function)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
