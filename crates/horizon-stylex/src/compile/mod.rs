//! Static compilation of a style value map into CSS ruleset text.
//!
//! The compiler is the ahead-of-time consumer of the value model: it turns
//! each entry into its own ruleset keyed by the element's
//! `data-stylex-id`, in property-then-entry order, newline-joined. No
//! merging or minification is attempted — precedence comes from rule order,
//! not from selector specificity.
//!
//! Conditions that only exist at runtime cannot always be expressed in
//! CSS. Child- and sibling-qualified entries, and combined entries mixing
//! incompatible hierarchy contexts, are skipped with a warning; the live
//! engine still honors them.

use crate::apply::transform;
use crate::error::Result;
use crate::selector::{Hierarchy, HierarchyRelation, Selector, SelectorKind, SelectorList};
use crate::value::{CssValue, PropertyValue, StyleValueMap, ValueEntry};
use crate::{ID_ATTRIBUTE, STATE_ATTRIBUTE_PREFIX};

/// Compile a style value map into CSS ruleset text for one element.
pub fn compile(map: &StyleValueMap, element_id: &str) -> Result<String> {
    map.validate()?;

    let mut rulesets = Vec::new();
    for (property, value) in map.iter() {
        let (property, rewrite) = declaration_name(property);
        match value {
            PropertyValue::Literal(literal) => {
                rulesets.push(plain_ruleset(element_id, &property, literal, rewrite.as_deref()));
            }
            PropertyValue::Dynamic(entries) => {
                for entry in entries {
                    match entry {
                        ValueEntry::Literal(literal) => {
                            rulesets.push(plain_ruleset(
                                element_id,
                                &property,
                                literal,
                                rewrite.as_deref(),
                            ));
                        }
                        ValueEntry::Conditional {
                            selectors, value, ..
                        } => {
                            if let Some(ruleset) = conditional_ruleset(
                                element_id,
                                &property,
                                value,
                                rewrite.as_deref(),
                                selectors,
                            ) {
                                rulesets.push(ruleset);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(rulesets.join("\n"))
}

/// `transform-<fn>` keys compile as a single-function `transform`
/// declaration; everything else compiles as-is.
fn declaration_name(property: &str) -> (String, Option<String>) {
    if transform::is_transform_property(property) {
        (
            "transform".to_string(),
            Some(transform::css_function_name(property)),
        )
    } else {
        (property.to_string(), None)
    }
}

fn declaration(property: &str, value: &CssValue, rewrite: Option<&str>) -> String {
    match rewrite {
        Some(function) => format!("{property}: {function}({value});"),
        None => format!("{property}: {value};"),
    }
}

fn plain_ruleset(
    element_id: &str,
    property: &str,
    value: &CssValue,
    rewrite: Option<&str>,
) -> String {
    format!(
        "[{ID_ATTRIBUTE}=\"{element_id}\"] {{ {} }}",
        declaration(property, value, rewrite)
    )
}

/// Compile one conditional entry, or `None` when it is runtime-only.
fn conditional_ruleset(
    element_id: &str,
    property: &str,
    value: &CssValue,
    rewrite: Option<&str>,
    selectors: &SelectorList,
) -> Option<String> {
    let mut media: Option<&str> = None;
    let mut subject_parts = String::new();
    let mut ancestor: Option<(&str, String)> = None;

    for selector in selectors.iter() {
        match &selector.kind {
            SelectorKind::Boolean(true) => continue,
            // A never-true entry is never emitted.
            SelectorKind::Boolean(false) => return None,
            SelectorKind::Media(query) => {
                if media.is_some() {
                    tracing::warn!(
                        property,
                        "skipping rule: cannot combine two media queries in one ruleset"
                    );
                    return None;
                }
                media = Some(query);
            }
            SelectorKind::Pseudo(_) | SelectorKind::Attribute { .. } => {
                match hierarchy_context(selector) {
                    HierarchyContext::Subject => {
                        subject_parts.push_str(&condition_text(&selector.kind));
                    }
                    HierarchyContext::Ancestor(target) => {
                        let part = condition_text(&selector.kind);
                        match &mut ancestor {
                            None => ancestor = Some((target, part)),
                            Some((existing, parts)) if *existing == target => {
                                parts.push_str(&part);
                            }
                            Some(_) => {
                                tracing::warn!(
                                    property,
                                    "skipping rule: conditions on two different ancestors"
                                );
                                return None;
                            }
                        }
                    }
                    HierarchyContext::RuntimeOnly => {
                        tracing::warn!(
                            property,
                            "skipping rule: descendant/sibling conditions are runtime-only"
                        );
                        return None;
                    }
                }
            }
        }
    }

    let subject = format!("[{ID_ATTRIBUTE}=\"{element_id}\"]{subject_parts}");
    let selector_text = match ancestor {
        // The ancestor composes with the descendant combinator, not `>`.
        Some((target, parts)) => {
            format!("[{ID_ATTRIBUTE}=\"{target}\"]{parts} {subject}")
        }
        None => subject,
    };

    let body = declaration(property, value, rewrite);
    Some(match media {
        Some(query) => format!("@media {query} {{ {selector_text} {{ {body} }} }}"),
        None => format!("{selector_text} {{ {body} }}"),
    })
}

enum HierarchyContext<'a> {
    Subject,
    Ancestor(&'a str),
    RuntimeOnly,
}

fn hierarchy_context(selector: &Selector) -> HierarchyContext<'_> {
    match &selector.hierarchy {
        None => HierarchyContext::Subject,
        Some(Hierarchy {
            relation: HierarchyRelation::Parent,
            target,
        }) => HierarchyContext::Ancestor(target),
        Some(_) => HierarchyContext::RuntimeOnly,
    }
}

fn condition_text(kind: &SelectorKind) -> String {
    match kind {
        SelectorKind::Pseudo(pseudo) => format!(":{}", pseudo.css_name()),
        SelectorKind::Attribute { name, value: None } => {
            format!("[{STATE_ATTRIBUTE_PREFIX}{name}]")
        }
        SelectorKind::Attribute {
            name,
            value: Some(value),
        } => format!("[{STATE_ATTRIBUTE_PREFIX}{name}=\"{value}\"]"),
        SelectorKind::Boolean(_) | SelectorKind::Media(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse;
    use crate::value::Settings;

    fn map_of(property: &str, value: PropertyValue) -> StyleValueMap {
        StyleValueMap::new().with(property, value)
    }

    #[test]
    fn literal_compiles_to_plain_ruleset() {
        let css = compile(&map_of("color", "red".into()), "a").unwrap();
        assert_eq!(css, r#"[data-stylex-id="a"] { color: red; }"#);
    }

    #[test]
    fn boolean_entries_emit_only_when_true() {
        let value = PropertyValue::Dynamic(vec![
            ValueEntry::when(parse("true").unwrap(), "red"),
            ValueEntry::when(parse("false").unwrap(), "blue"),
        ]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(css, r#"[data-stylex-id="a"] { color: red; }"#);
    }

    #[test]
    fn pseudo_compiles_on_the_subject() {
        let value = PropertyValue::Dynamic(vec![
            ValueEntry::when(parse(":hover").unwrap(), "red"),
            ValueEntry::fallback("blue"),
        ]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(
            css,
            "[data-stylex-id=\"a\"]:hover { color: red; }\n[data-stylex-id=\"a\"] { color: blue; }"
        );
    }

    #[test]
    fn parent_pseudo_uses_descendant_combinator() {
        // The ancestor composes with a descendant combinator (a space, not
        // `>`); this is pinned behavior.
        let value =
            PropertyValue::Dynamic(vec![ValueEntry::when(parse("card>:hover").unwrap(), "red")]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(
            css,
            r#"[data-stylex-id="card"]:hover [data-stylex-id="a"] { color: red; }"#
        );
    }

    #[test]
    fn attribute_with_and_without_value() {
        let value = PropertyValue::Dynamic(vec![
            ValueEntry::when(parse("@open=yes").unwrap(), "red"),
            ValueEntry::when(parse("@open").unwrap(), "blue"),
        ]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(
            css,
            "[data-stylex-id=\"a\"][data-stylex-open=\"yes\"] { color: red; }\n\
             [data-stylex-id=\"a\"][data-stylex-open] { color: blue; }"
        );
    }

    #[test]
    fn media_wraps_the_ruleset() {
        let value = PropertyValue::Dynamic(vec![ValueEntry::when(
            parse("@media (max-width: 600px)").unwrap(),
            "none",
        )]);
        let css = compile(&map_of("display", value), "a").unwrap();
        assert_eq!(
            css,
            r#"@media (max-width: 600px) { [data-stylex-id="a"] { display: none; } }"#
        );
    }

    #[test]
    fn transform_key_compiles_to_transform_function() {
        let css = compile(&map_of("transform-translate-x", "10px".into()), "a").unwrap();
        assert_eq!(
            css,
            r#"[data-stylex-id="a"] { transform: translateX(10px); }"#
        );
    }

    #[test]
    fn combined_entry_concatenates_compatible_parts() {
        let value = PropertyValue::Dynamic(vec![ValueEntry::Conditional {
            selectors: crate::selector::parse_list(":hover & @open=yes").unwrap(),
            value: "red".into(),
            settings: None,
        }]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(
            css,
            r#"[data-stylex-id="a"]:hover[data-stylex-open="yes"] { color: red; }"#
        );
    }

    #[test]
    fn combined_entry_with_media_wraps_compound_rule() {
        let value = PropertyValue::Dynamic(vec![ValueEntry::Conditional {
            selectors: crate::selector::parse_list("@media (max-width: 600px) & :hover").unwrap(),
            value: "red".into(),
            settings: None,
        }]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(
            css,
            r#"@media (max-width: 600px) { [data-stylex-id="a"]:hover { color: red; } }"#
        );
    }

    #[test]
    fn runtime_only_entries_are_skipped() {
        let value = PropertyValue::Dynamic(vec![
            ValueEntry::when(parse(">row:hover").unwrap(), "red"),
            ValueEntry::fallback("blue"),
        ]);
        let css = compile(&map_of("color", value), "a").unwrap();
        assert_eq!(css, r#"[data-stylex-id="a"] { color: blue; }"#);
    }

    #[test]
    fn rulesets_follow_property_then_entry_order() {
        let map = StyleValueMap::new()
            .with(
                "color",
                PropertyValue::Dynamic(vec![
                    ValueEntry::when_with(parse(":hover").unwrap(), "red", Settings::transition(100)),
                    ValueEntry::fallback("blue"),
                ]),
            )
            .with("width", "2px");
        let css = compile(&map, "a").unwrap();
        let lines: Vec<&str> = css.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(":hover"));
        assert!(lines[1].contains("color: blue"));
        assert!(lines[2].contains("width: 2px"));
    }

    #[test]
    fn invalid_map_fails_before_emitting() {
        let map = map_of(
            "color",
            PropertyValue::Dynamic(vec![
                ValueEntry::fallback("blue"),
                ValueEntry::when(parse(":hover").unwrap(), "red"),
            ]),
        );
        assert!(compile(&map, "a").is_err());
    }
}
