//! Selector type definitions.

use std::fmt;

/// How a hierarchy qualifier redirects the match target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HierarchyRelation {
    /// `id>` — nearest ancestor (or self) carrying the id.
    Parent,
    /// `>id` — first descendant carrying the id.
    Child,
    /// `~id` — first element carrying the id within the parent's subtree.
    Sibling,
}

/// A hierarchy qualifier: relation plus the target element's stylex id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hierarchy {
    /// How to walk from the styled element to the target.
    pub relation: HierarchyRelation,
    /// The `data-stylex-id` value of the target.
    pub target: String,
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation {
            HierarchyRelation::Parent => write!(f, "{}>", self.target),
            HierarchyRelation::Child => write!(f, ">{}", self.target),
            HierarchyRelation::Sibling => write!(f, "~{}", self.target),
        }
    }
}

/// Pseudo-class conditions the engine can observe live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// The pointer is over the element.
    Hover,
    /// A pointer is pressed on the element.
    Active,
    /// The element has keyboard focus.
    Focus,
}

impl PseudoClass {
    /// Parse a pseudo-class name (without the leading `:`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hover" => Some(Self::Hover),
            "active" | "pressed" => Some(Self::Active),
            "focus" | "focused" => Some(Self::Focus),
            _ => None,
        }
    }

    /// The CSS pseudo-class name (without the leading `:`).
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Active => "active",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_name())
    }
}

/// The condition kind of a selector core, after hierarchy stripping.
///
/// Classification precedence lives in [`parse`](super::parse); call sites
/// match on this closed set instead of re-inspecting strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// Always/never, without any document lookup.
    Boolean(bool),
    /// A media query (the `@media` prefix already stripped).
    Media(String),
    /// A live pseudo-state of the (possibly redirected) element.
    Pseudo(PseudoClass),
    /// A synthesized state attribute; `value: None` means "present with any
    /// value".
    Attribute {
        name: String,
        value: Option<String>,
    },
}

/// One parsed selector: a condition kind plus an optional hierarchy
/// qualifier redirecting the element it is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// The condition to check.
    pub kind: SelectorKind,
    /// Where to check it, if not on the styled element itself.
    pub hierarchy: Option<Hierarchy>,
}

impl Selector {
    /// A boolean selector with no hierarchy.
    pub fn boolean(value: bool) -> Self {
        Self {
            kind: SelectorKind::Boolean(value),
            hierarchy: None,
        }
    }
}

impl fmt::Display for Selector {
    /// Renders the stripped core only: a parsed selector's string form
    /// never carries a hierarchy prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SelectorKind::Boolean(value) => write!(f, "{value}"),
            SelectorKind::Media(query) => write!(f, "@media {query}"),
            SelectorKind::Pseudo(pseudo) => write!(f, ":{pseudo}"),
            SelectorKind::Attribute { name, value: None } => write!(f, "@{name}"),
            SelectorKind::Attribute {
                name,
                value: Some(value),
            } => write!(f, "@{name}={value}"),
        }
    }
}

/// A non-empty conjunction of selectors (the `&`-combined form).
///
/// A single-token selector is a list of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorList {
    components: Vec<Selector>,
}

impl SelectorList {
    /// Build from components. Panics on an empty list; parsed lists are
    /// never empty.
    pub fn new(components: Vec<Selector>) -> Self {
        assert!(!components.is_empty(), "selector list cannot be empty");
        Self { components }
    }

    /// A list of one.
    pub fn single(selector: Selector) -> Self {
        Self {
            components: vec![selector],
        }
    }

    /// The components, in source order.
    pub fn components(&self) -> &[Selector] {
        &self.components
    }

    /// Iterate the components.
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.components.iter()
    }

    /// Number of components (always at least one).
    pub fn len(&self) -> usize {
        self.components.len()
    }
}
