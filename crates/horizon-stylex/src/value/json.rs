//! JSON decoding of style attributes.
//!
//! The markup front end hands the engine the raw attribute text. It must
//! decode to an object whose values are:
//!
//! - a string or number (plain literal), or
//! - an array mixing strings/numbers (literal entries) with tuples
//!   `[selectorToken, cssValue]` or `[selectorToken, cssValue, settings]`,
//!   where `selectorToken` is a string or a bare JSON boolean and
//!   `settings` is `{"transition": <ms>, "function": <timing keyword>}`.
//!
//! Property order in the JSON object is preserved. All selector tokens are
//! parsed eagerly; the first malformed piece fails the whole decode.

use std::time::Duration;

use serde_json::Value as Json;

use crate::apply::easing::Easing;
use crate::error::{Error, Result};
use crate::selector::{parse_list, Selector, SelectorList};

use super::{CssValue, PropertyValue, Settings, StyleValueMap, ValueEntry};

pub(super) fn from_json(text: &str) -> Result<StyleValueMap> {
    let root: Json = serde_json::from_str(text)?;
    let Json::Object(object) = root else {
        return Err(Error::validation("style attribute must be a JSON object"));
    };

    let mut map = StyleValueMap::new();
    for (property, value) in object {
        let value = property_value(&property, value)?;
        map.insert(property, value);
    }
    map.validate()?;
    Ok(map)
}

fn property_value(property: &str, json: Json) -> Result<PropertyValue> {
    match json {
        Json::String(text) => Ok(PropertyValue::Literal(CssValue::Str(text))),
        Json::Number(number) => Ok(PropertyValue::Literal(css_number(property, &number)?)),
        Json::Array(items) => {
            let entries = items
                .into_iter()
                .map(|item| entry(property, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(PropertyValue::Dynamic(entries))
        }
        other => Err(Error::invalid_value(
            property,
            format!("expected string, number, or array, got {}", kind_name(&other)),
        )),
    }
}

fn entry(property: &str, json: Json) -> Result<ValueEntry> {
    match json {
        Json::String(text) => Ok(ValueEntry::Literal(CssValue::Str(text))),
        Json::Number(number) => Ok(ValueEntry::Literal(css_number(property, &number)?)),
        Json::Array(tuple) => {
            let mut parts = tuple.into_iter();
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(selector_json), Some(value_json), settings_json, None) => {
                    let selectors = selector_token(property, selector_json)?;
                    let value = css_value(property, value_json)?;
                    let settings = settings_json.map(|s| settings(property, s)).transpose()?;
                    Ok(ValueEntry::Conditional {
                        selectors,
                        value,
                        settings,
                    })
                }
                _ => Err(Error::invalid_value(
                    property,
                    "a dynamic entry is [selector, value] or [selector, value, settings]",
                )),
            }
        }
        other => Err(Error::invalid_value(
            property,
            format!("invalid entry of type {}", kind_name(&other)),
        )),
    }
}

fn selector_token(property: &str, json: Json) -> Result<SelectorList> {
    match json {
        Json::String(token) => parse_list(&token),
        Json::Bool(value) => Ok(SelectorList::single(Selector::boolean(value))),
        other => Err(Error::invalid_value(
            property,
            format!("selector must be a string or boolean, got {}", kind_name(&other)),
        )),
    }
}

fn css_value(property: &str, json: Json) -> Result<CssValue> {
    match json {
        Json::String(text) => Ok(CssValue::Str(text)),
        Json::Number(number) => css_number(property, &number),
        other => Err(Error::invalid_value(
            property,
            format!("value must be a string or number, got {}", kind_name(&other)),
        )),
    }
}

fn settings(property: &str, json: Json) -> Result<Settings> {
    let Json::Object(object) = json else {
        return Err(Error::invalid_value(property, "settings must be an object"));
    };

    let mut settings = Settings::default();
    for (key, value) in object {
        match key.as_str() {
            "transition" => {
                let millis = value.as_u64().ok_or_else(|| {
                    Error::invalid_value(property, "'transition' must be milliseconds")
                })?;
                settings.duration = Some(Duration::from_millis(millis));
            }
            "function" => {
                let name = value.as_str().ok_or_else(|| {
                    Error::invalid_value(property, "'function' must be a timing keyword")
                })?;
                settings.easing = Some(Easing::from_css(name).ok_or_else(|| {
                    Error::invalid_value(property, format!("unknown timing function '{name}'"))
                })?);
            }
            other => {
                return Err(Error::invalid_value(
                    property,
                    format!("unknown settings key '{other}'"),
                ));
            }
        }
    }
    Ok(settings)
}

fn css_number(property: &str, number: &serde_json::Number) -> Result<CssValue> {
    number
        .as_f64()
        .map(CssValue::Number)
        .ok_or_else(|| Error::invalid_value(property, "number out of range"))
}

fn kind_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
