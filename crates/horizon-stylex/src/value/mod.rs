//! The style value model.
//!
//! A [`StyleValueMap`] assigns each CSS property a [`PropertyValue`]:
//! either a plain literal, or an ordered sequence of [`ValueEntry`]
//! conditions evaluated first-to-last with first-match-wins semantics. Map
//! iteration order is declaration order and is semantically significant —
//! it fixes `transform` sub-function ordering and default placement.
//!
//! Maps are cheap, disposable values: the reactive host produces a fresh
//! one on every re-evaluation.

mod json;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use horizon_stylex_dom::{Document, NodeId};

use crate::apply::easing::Easing;
use crate::error::{Error, Result};
use crate::selector::{Selector, SelectorList};

/// A CSS value: raw declaration text or a bare number.
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    /// Declaration text, e.g. `"10px"` or `"red"`.
    Str(String),
    /// A unitless number.
    Number(f64),
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(text) => write!(f, "{text}"),
            Self::Number(number) => {
                if number.fract() == 0.0 {
                    write!(f, "{}", *number as i64)
                } else {
                    write!(f, "{number}")
                }
            }
        }
    }
}

impl From<&str> for CssValue {
    fn from(text: &str) -> Self {
        Self::Str(text.to_string())
    }
}

impl From<String> for CssValue {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<f64> for CssValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for CssValue {
    fn from(number: i32) -> Self {
        Self::Number(number.into())
    }
}

/// Callback invoked around a value transition.
pub type StyleCallback = Arc<dyn Fn(&Document, NodeId) + Send + Sync>;

/// Per-entry transition settings.
#[derive(Clone, Default)]
pub struct Settings {
    /// How long a change to this value animates. `None` means apply
    /// discretely.
    pub duration: Option<Duration>,
    /// Easing for the animation; linear when unset.
    pub easing: Option<Easing>,
    /// Invoked when a transition begins.
    pub on_start: Option<StyleCallback>,
    /// Invoked when a transition completes or is finalized by a successor.
    pub on_end: Option<StyleCallback>,
}

impl Settings {
    /// Transition over `millis` milliseconds.
    pub fn transition(millis: u64) -> Self {
        Self {
            duration: Some(Duration::from_millis(millis)),
            ..Self::default()
        }
    }

    /// Set the easing function.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Set the start callback.
    pub fn with_on_start(mut self, callback: StyleCallback) -> Self {
        self.on_start = Some(callback);
        self
    }

    /// Set the end callback.
    pub fn with_on_end(mut self, callback: StyleCallback) -> Self {
        self.on_end = Some(callback);
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("on_start", &self.on_start.as_ref().map(|_| ".."))
            .field("on_end", &self.on_end.as_ref().map(|_| ".."))
            .finish()
    }
}

/// One entry in a dynamic property value.
#[derive(Debug, Clone)]
pub enum ValueEntry {
    /// An unconditional fallback; legal only as the terminal entry.
    Literal(CssValue),
    /// A condition-qualified value.
    Conditional {
        /// The conjunction that must match for this entry to apply.
        selectors: SelectorList,
        /// The value to apply.
        value: CssValue,
        /// How the change animates, if at all.
        settings: Option<Settings>,
    },
}

impl ValueEntry {
    /// A condition-qualified entry without settings.
    pub fn when(selector: Selector, value: impl Into<CssValue>) -> Self {
        Self::Conditional {
            selectors: SelectorList::single(selector),
            value: value.into(),
            settings: None,
        }
    }

    /// A condition-qualified entry with settings.
    pub fn when_with(selector: Selector, value: impl Into<CssValue>, settings: Settings) -> Self {
        Self::Conditional {
            selectors: SelectorList::single(selector),
            value: value.into(),
            settings: Some(settings),
        }
    }

    /// An unconditional fallback entry.
    pub fn fallback(value: impl Into<CssValue>) -> Self {
        Self::Literal(value.into())
    }
}

/// A property's value: a plain literal or an ordered dynamic sequence.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// A plain, unconditional value.
    Literal(CssValue),
    /// First-match-wins sequence of entries.
    Dynamic(Vec<ValueEntry>),
}

impl PropertyValue {
    /// Whether this is a plain literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Whether this is a dynamic sequence.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    /// Attach default settings to every conditional entry that carries
    /// none (the sequence-wide settings form).
    pub fn with_default_settings(mut self, default: Settings) -> Self {
        if let Self::Dynamic(entries) = &mut self {
            for entry in entries {
                if let ValueEntry::Conditional { settings, .. } = entry {
                    if settings.is_none() {
                        *settings = Some(default.clone());
                    }
                }
            }
        }
        self
    }

    fn validate(&self, property: &str) -> Result<()> {
        let Self::Dynamic(entries) = self else {
            return Ok(());
        };
        if entries.is_empty() {
            return Err(Error::invalid_value(property, "empty value sequence"));
        }
        for entry in &entries[..entries.len() - 1] {
            if matches!(entry, ValueEntry::Literal(_)) {
                return Err(Error::invalid_value(
                    property,
                    "a literal fallback must be the terminal entry",
                ));
            }
        }
        Ok(())
    }
}

impl From<CssValue> for PropertyValue {
    fn from(value: CssValue) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        Self::Literal(text.into())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        Self::Literal(text.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(number: f64) -> Self {
        Self::Literal(number.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(number: i32) -> Self {
        Self::Literal(number.into())
    }
}

impl From<Vec<ValueEntry>> for PropertyValue {
    fn from(entries: Vec<ValueEntry>) -> Self {
        Self::Dynamic(entries)
    }
}

/// An ordered property-to-value map.
///
/// Keys are unique; inserting an existing key replaces the value in place,
/// preserving its original position.
#[derive(Debug, Clone, Default)]
pub struct StyleValueMap {
    entries: Vec<(String, PropertyValue)>,
}

impl StyleValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a map from style-attribute JSON text.
    ///
    /// Values are strings/numbers, or arrays mixing literals with
    /// `[selectorToken, cssValue]` and `[selectorToken, cssValue, settings]`
    /// tuples. Selector tokens are parsed eagerly, so malformed input fails
    /// here, before any document mutation.
    pub fn from_json(text: &str) -> Result<Self> {
        json::from_json(text)
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<PropertyValue>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Look up a property.
    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check shape invariants: dynamic sequences are non-empty and carry a
    /// literal only in terminal position.
    ///
    /// Duplicate equivalent selectors are legal — earlier entries simply
    /// shadow later ones.
    pub fn validate(&self) -> Result<()> {
        for (property, value) in &self.entries {
            value.validate(property)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, PropertyValue)> for StyleValueMap {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (property, value) in iter {
            map.insert(property, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse;

    #[test]
    fn insert_replaces_in_place() {
        let mut map = StyleValueMap::new();
        map.insert("color", "red");
        map.insert("width", "2px");
        map.insert("color", "blue");

        let order: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["color", "width"]);
        assert!(matches!(
            map.get("color"),
            Some(PropertyValue::Literal(CssValue::Str(s))) if s == "blue"
        ));
    }

    #[test]
    fn literal_predicates() {
        let literal = PropertyValue::from("red");
        assert!(literal.is_literal());
        assert!(!literal.is_dynamic());

        let dynamic = PropertyValue::Dynamic(vec![ValueEntry::fallback("red")]);
        assert!(dynamic.is_dynamic());
    }

    #[test]
    fn non_terminal_literal_is_rejected() {
        let map = StyleValueMap::new().with(
            "color",
            PropertyValue::Dynamic(vec![
                ValueEntry::fallback("green"),
                ValueEntry::when(parse(":hover").unwrap(), "red"),
            ]),
        );
        assert!(matches!(map.validate(), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn terminal_literal_is_legal() {
        let map = StyleValueMap::new().with(
            "color",
            PropertyValue::Dynamic(vec![
                ValueEntry::when(parse(":hover").unwrap(), "red"),
                ValueEntry::fallback("green"),
            ]),
        );
        assert!(map.validate().is_ok());
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let map = StyleValueMap::new().with("color", PropertyValue::Dynamic(vec![]));
        assert!(map.validate().is_err());
    }

    #[test]
    fn shadowing_duplicate_selectors_are_legal() {
        let map = StyleValueMap::new().with(
            "color",
            PropertyValue::Dynamic(vec![
                ValueEntry::when(parse("@x").unwrap(), "red"),
                ValueEntry::when(parse("@x=1").unwrap(), "blue"),
                ValueEntry::fallback("green"),
            ]),
        );
        assert!(map.validate().is_ok());
    }

    #[test]
    fn default_settings_fill_only_unset_entries() {
        let explicit = Settings::transition(100);
        let value = PropertyValue::Dynamic(vec![
            ValueEntry::when(parse(":hover").unwrap(), "red"),
            ValueEntry::when_with(parse(":active").unwrap(), "blue", explicit),
            ValueEntry::fallback("green"),
        ])
        .with_default_settings(Settings::transition(500));

        let PropertyValue::Dynamic(entries) = value else {
            unreachable!()
        };
        let durations: Vec<Option<Duration>> = entries
            .iter()
            .map(|entry| match entry {
                ValueEntry::Conditional { settings, .. } => {
                    settings.as_ref().and_then(|s| s.duration)
                }
                ValueEntry::Literal(_) => None,
            })
            .collect();
        assert_eq!(
            durations,
            vec![
                Some(Duration::from_millis(500)),
                Some(Duration::from_millis(100)),
                None,
            ]
        );
    }

    #[test]
    fn css_value_display() {
        assert_eq!(CssValue::from("10px").to_string(), "10px");
        assert_eq!(CssValue::from(2.0).to_string(), "2");
        assert_eq!(CssValue::from(0.5).to_string(), "0.5");
    }
}
