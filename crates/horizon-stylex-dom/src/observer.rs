//! Attribute mutation observers.
//!
//! An observer watches one element's attributes and is invoked with the
//! mutated attribute's name whenever [`Document::set_attribute`] or
//! [`Document::remove_attribute`] actually changes a value. Unchanged
//! writes do not fire.
//!
//! [`Document::set_attribute`]: crate::Document::set_attribute
//! [`Document::remove_attribute`]: crate::Document::remove_attribute

use std::sync::Arc;

use slotmap::new_key_type;

use crate::document::NodeId;

new_key_type! {
    /// A unique identifier for an attribute observer.
    ///
    /// Remains valid until disconnected via
    /// [`Document::disconnect_observer`](crate::Document::disconnect_observer).
    pub struct ObserverId;
}

/// Callback invoked with the name of the mutated attribute.
pub type AttributeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// A registered attribute observer.
pub(crate) struct ObserverData {
    pub target: NodeId,
    pub callback: AttributeCallback,
}
