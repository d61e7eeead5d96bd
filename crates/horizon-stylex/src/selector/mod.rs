//! Selector DSL: types and parsing.
//!
//! A selector token describes one condition under which a property value
//! applies. Tokens combine an optional hierarchy qualifier with a core:
//!
//! | Token            | Meaning                                              |
//! |------------------|------------------------------------------------------|
//! | `true` / `false` | Boolean, no document lookup                          |
//! | `@media (…)`     | Media query                                          |
//! | `:hover`         | Pseudo-state of the element                          |
//! | `@open`          | `data-stylex-open` attribute present                 |
//! | `@open=yes`      | `data-stylex-open` attribute equals `"yes"` exactly  |
//! | `card>:hover`    | Pseudo-state of the ancestor with id `card`          |
//! | `>row@sel`       | Attribute state of the descendant with id `row`      |
//! | `~row:hover`     | Pseudo-state of the sibling-scope element `row`      |
//!
//! Several tokens joined with `&` form a conjunction: the entry applies
//! only while every component matches, and each component contributes its
//! own listeners.

mod parse;
mod types;

pub use parse::{parse, parse_list};
pub use types::{Hierarchy, HierarchyRelation, PseudoClass, Selector, SelectorKind, SelectorList};
