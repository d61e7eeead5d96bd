//! Live selector matching and value resolution.
//!
//! Matching is synchronous and reads current document state only — there is
//! no caching between calls, and no event-remembered flags: `:active` is
//! answered from the element's live pressed state, not from a latch the
//! matcher maintains.
//!
//! Hierarchy qualifiers redirect the element a condition is checked
//! against. A qualifier whose target cannot be resolved makes the whole
//! selector read as `false`; no kind logic runs.

use horizon_stylex_dom::{Document, NodeId};

use crate::selector::{Hierarchy, HierarchyRelation, PseudoClass, Selector, SelectorKind, SelectorList};
use crate::value::{CssValue, PropertyValue, Settings, ValueEntry};
use crate::{ID_ATTRIBUTE, STATE_ATTRIBUTE_PREFIX};

/// Resolve a hierarchy qualifier to the element it redirects to.
///
/// - `Parent`: nearest ancestor-or-self carrying the target id.
/// - `Child`: first descendant (document order) carrying the target id.
/// - `Sibling`: first carrier within the parent's subtree (which may be the
///   element itself or a sibling's descendant, mirroring a
///   `parent.querySelector` lookup).
pub fn resolve_hierarchy(doc: &Document, hierarchy: &Hierarchy, element: NodeId) -> Option<NodeId> {
    match hierarchy.relation {
        HierarchyRelation::Parent => {
            doc.closest_with_attribute(element, ID_ATTRIBUTE, &hierarchy.target)
        }
        HierarchyRelation::Child => {
            doc.descendant_with_attribute(element, ID_ATTRIBUTE, &hierarchy.target)
        }
        HierarchyRelation::Sibling => doc
            .parent(element)
            .and_then(|parent| doc.descendant_with_attribute(parent, ID_ATTRIBUTE, &hierarchy.target)),
    }
}

/// Whether a single selector currently matches for `element`.
pub fn matches_selector(doc: &Document, selector: &Selector, element: NodeId) -> bool {
    let target = match &selector.hierarchy {
        Some(hierarchy) => match resolve_hierarchy(doc, hierarchy, element) {
            Some(target) => target,
            None => return false,
        },
        None => element,
    };

    match &selector.kind {
        SelectorKind::Boolean(value) => *value,
        SelectorKind::Media(query) => doc.media().matches(query),
        SelectorKind::Pseudo(pseudo) => match pseudo {
            PseudoClass::Hover => doc.is_hovered(target),
            PseudoClass::Active => doc.is_active(target),
            PseudoClass::Focus => doc.is_focused(target),
        },
        SelectorKind::Attribute { name, value } => {
            let attribute = format!("{STATE_ATTRIBUTE_PREFIX}{name}");
            match value {
                None => doc.has_attribute(target, &attribute),
                Some(expected) => {
                    doc.attribute(target, &attribute).as_deref() == Some(expected.as_str())
                }
            }
        }
    }
}

/// Whether a conjunction currently matches: every component must match.
pub fn matches_list(doc: &Document, list: &SelectorList, element: NodeId) -> bool {
    list.iter()
        .all(|selector| matches_selector(doc, selector, element))
}

/// Resolve a property's current value.
///
/// Entries are walked in declaration order; the first match wins. A literal
/// entry matches unconditionally. `None` means no entry matched and no
/// fallback exists — the caller removes the CSS property.
pub fn resolve_value<'a>(
    doc: &Document,
    value: &'a PropertyValue,
    element: NodeId,
) -> Option<(&'a CssValue, Option<&'a Settings>)> {
    match value {
        PropertyValue::Literal(literal) => Some((literal, None)),
        PropertyValue::Dynamic(entries) => {
            for entry in entries {
                match entry {
                    ValueEntry::Literal(literal) => return Some((literal, None)),
                    ValueEntry::Conditional {
                        selectors,
                        value,
                        settings,
                    } => {
                        if matches_list(doc, selectors, element) {
                            return Some((value, settings.as_ref()));
                        }
                    }
                }
            }
            None
        }
    }
}
