//! Selector token parsing.
//!
//! Parsing is pure and total: every string either produces a selector or a
//! [`Error::SelectorSyntax`]. Hierarchy-prefix stripping always happens
//! before kind classification, and classification precedence is fixed:
//! boolean literal, then `@media`, then pseudo (including the legacy
//! `@hover`/`@active`/`@focus` spellings), then attribute.

use crate::error::{Error, Result};

use super::types::{Hierarchy, HierarchyRelation, PseudoClass, Selector, SelectorKind, SelectorList};

/// Parse one selector token.
pub fn parse(token: &str) -> Result<Selector> {
    let trimmed = token.trim();
    let (hierarchy, core) = strip_hierarchy(trimmed);
    let kind = classify(token, core)?;

    if hierarchy.is_some() && matches!(kind, SelectorKind::Media(_)) {
        return Err(Error::selector(
            token,
            "a media query cannot be hierarchy-qualified",
        ));
    }

    Ok(Selector { kind, hierarchy })
}

/// Parse a token that may combine several selectors with `&`.
pub fn parse_list(token: &str) -> Result<SelectorList> {
    let components = token
        .split('&')
        .map(|part| parse(part.trim()))
        .collect::<Result<Vec<_>>>()?;
    if components.is_empty() {
        return Err(Error::selector(token, "empty selector"));
    }
    Ok(SelectorList::new(components))
}

/// Strip at most one hierarchy qualifier off the front of a token.
///
/// The three patterns (`id>`, `>id`, `~id`) are mutually exclusive by
/// construction; ids are lowercase ASCII.
fn strip_hierarchy(token: &str) -> (Option<Hierarchy>, &str) {
    // `id>` — ancestor lookup.
    let id_len = token
        .bytes()
        .take_while(u8::is_ascii_lowercase)
        .count();
    if id_len > 0 && token[id_len..].starts_with('>') {
        return (
            Some(Hierarchy {
                relation: HierarchyRelation::Parent,
                target: token[..id_len].to_string(),
            }),
            &token[id_len + 1..],
        );
    }

    // `>id` — descendant lookup.
    if let Some(rest) = token.strip_prefix('>') {
        let id_len = rest.bytes().take_while(u8::is_ascii_lowercase).count();
        if id_len > 0 {
            return (
                Some(Hierarchy {
                    relation: HierarchyRelation::Child,
                    target: rest[..id_len].to_string(),
                }),
                &rest[id_len..],
            );
        }
    }

    // `~id` — sibling lookup.
    if let Some(rest) = token.strip_prefix('~') {
        let id_len = rest.bytes().take_while(u8::is_ascii_lowercase).count();
        if id_len > 0 {
            return (
                Some(Hierarchy {
                    relation: HierarchyRelation::Sibling,
                    target: rest[..id_len].to_string(),
                }),
                &rest[id_len..],
            );
        }
    }

    (None, token)
}

/// Classify a stripped core. `token` is the original text, kept for error
/// reporting.
fn classify(token: &str, core: &str) -> Result<SelectorKind> {
    if core.is_empty() {
        return Err(Error::selector(token, "empty selector"));
    }

    if core == "true" || core == "false" {
        return Ok(SelectorKind::Boolean(core == "true"));
    }

    if let Some(query) = core.strip_prefix("@media") {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::selector(token, "missing media query"));
        }
        return Ok(SelectorKind::Media(query.to_string()));
    }

    if let Some(name) = core.strip_prefix(':') {
        return PseudoClass::from_name(name)
            .map(SelectorKind::Pseudo)
            .ok_or_else(|| Error::selector(token, format!("unknown pseudo-class ':{name}'")));
    }

    if let Some(rest) = core.strip_prefix('@') {
        // Legacy pseudo spellings predate the `:` prefix and win over
        // attribute classification.
        if let Some(pseudo) = PseudoClass::from_name(rest) {
            return Ok(SelectorKind::Pseudo(pseudo));
        }
        return attribute_kind(token, rest);
    }

    Err(Error::selector(token, "unrecognized selector shape"))
}

fn attribute_kind(token: &str, rest: &str) -> Result<SelectorKind> {
    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };

    if name.is_empty() {
        return Err(Error::selector(token, "attribute selector needs a name"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return Err(Error::selector(
            token,
            format!("invalid attribute name '{name}'"),
        ));
    }
    if value == Some("") {
        return Err(Error::selector(token, "expected a value after '='"));
    }

    Ok(SelectorKind::Attribute {
        name: name.to_string(),
        value: value.map(str::to_string),
    })
}
