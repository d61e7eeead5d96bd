//! In-memory document environment for Horizon StyleX.
//!
//! This crate provides the host capabilities the StyleX engine is written
//! against, as explicit values rather than ambient globals:
//!
//! - **Document**: an element tree with attributes, inline styles, and
//!   live pseudo-state (hover/active/focus)
//! - **Events**: element- and root-scoped listeners with exact removal
//! - **Observers**: per-element attribute mutation callbacks
//! - **Media**: a reference-counted media query registry
//! - **Frames**: a manually-driven frame scheduler for animations
//!
//! Everything hangs off a [`Document`] handle that the caller creates and
//! passes around, so every behavior is deterministic under test.
//!
//! # Example
//!
//! ```
//! use horizon_stylex_dom::Document;
//!
//! let doc = Document::new();
//! let button = doc.create_element("button");
//! doc.set_attribute(button, "data-stylex-id", "submit");
//! doc.set_style_property(button, "color", "red");
//!
//! assert_eq!(doc.style_text(button), "color: red;");
//! ```

pub mod document;
pub mod events;
pub mod frame;
pub mod media;
pub mod observer;

pub use document::{Document, NodeId};
pub use events::{Event, EventCallback, EventKind, ListenerId};
pub use frame::{FrameCallback, FrameRequestId, FrameScheduler};
pub use media::{MediaCallback, MediaRegistry, MediaWatcherId};
pub use observer::{AttributeCallback, ObserverId};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::document::{Document, NodeId};
    pub use crate::events::{Event, EventKind, ListenerId};
    pub use crate::frame::{FrameRequestId, FrameScheduler};
    pub use crate::media::{MediaRegistry, MediaWatcherId};
    pub use crate::observer::ObserverId;
}
