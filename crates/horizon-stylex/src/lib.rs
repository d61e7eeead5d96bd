//! Condition-driven dynamic style value engine.
//!
//! A *style value map* assigns each CSS property either a plain value or an
//! ordered list of `(selector, value)` entries whose selectors describe
//! conditions: pseudo-state (`:hover`, `:active`), media queries
//! (`@media …`), data-attribute state (`@name=value`), booleans, and
//! hierarchy-qualified variants of all of these (`card>:hover` — "the
//! ancestor tagged `card` is hovered"). This crate provides:
//!
//! - **Parsing**: the selector DSL as a closed tagged type ([`selector`])
//! - **Static compilation**: a map plus an element id into CSS ruleset text
//!   for ahead-of-time stylesheet emission ([`compile`])
//! - **Live evaluation**: matching selectors against current document state
//!   ([`resolve`]), subscribing to exactly the signals a map references
//!   ([`subscribe`]), and committing resolved values to inline style,
//!   including `transform` sub-function aggregation and value transitions
//!   ([`apply`])
//! - **Binding**: the runtime driver tying it all together for one element
//!   ([`binding`])
//!
//! The engine runs against the explicit environment in
//! [`horizon_stylex_dom`] rather than ambient globals, so everything is
//! deterministic under test.
//!
//! # Example
//!
//! ```
//! use horizon_stylex::prelude::*;
//! use horizon_stylex_dom::Document;
//!
//! let doc = Document::new();
//! let el = doc.create_element("button");
//!
//! let map = StyleValueMap::from_json(
//!     r#"{ "color": [[":hover", "red"], "blue"] }"#,
//! ).unwrap();
//!
//! // Static CSS for the same map:
//! let css = compile(&map, "submit").unwrap();
//! assert!(css.contains(r#"[data-stylex-id="submit"]:hover { color: red; }"#));
//!
//! // Live binding: the element follows its hover state.
//! let binding = StyleBinding::bind(&doc, el, move || map.clone(), EngineConfig::default()).unwrap();
//! assert_eq!(doc.style_property(el, "color").as_deref(), Some("blue"));
//! doc.set_hover_target(Some(el));
//! assert_eq!(doc.style_property(el, "color").as_deref(), Some("red"));
//! # drop(binding);
//! ```

pub mod apply;
pub mod binding;
pub mod compile;
pub mod resolve;
pub mod selector;
pub mod subscribe;
pub mod value;

mod error;

pub use error::{Error, Result};

/// The attribute carrying an element's stable identity, written by the
/// markup front end and read by the matcher and compiler.
pub const ID_ATTRIBUTE: &str = "data-stylex-id";

/// Prefix of the synthesized state attributes the attribute selectors read
/// (`@open` matches `data-stylex-open`).
pub const STATE_ATTRIBUTE_PREFIX: &str = "data-stylex-";

/// Prefix of the custom properties that indirect `transform` sub-function
/// values (`transform-translate-x` writes `--transform-translateX`).
pub const TRANSFORM_VAR_PREFIX: &str = "--transform-";

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::apply::easing::Easing;
    pub use crate::binding::{EngineConfig, StyleBinding};
    pub use crate::compile::compile;
    pub use crate::resolve::{matches_list, matches_selector, resolve_value};
    pub use crate::selector::{
        Hierarchy, HierarchyRelation, PseudoClass, Selector, SelectorKind, SelectorList,
    };
    pub use crate::subscribe::SubscriptionPolicy;
    pub use crate::value::{CssValue, PropertyValue, Settings, StyleValueMap, ValueEntry};
    pub use crate::{Error, Result};
}
