//! Event types and listener handles.
//!
//! Listeners are registered on the [`Document`](crate::Document), either
//! scoped to a single element or to the document root (used for pointer
//! releases that must be seen regardless of where the pointer is). Each
//! registration returns a [`ListenerId`] for exact removal.

use std::sync::Arc;

use slotmap::new_key_type;

use crate::document::NodeId;

new_key_type! {
    /// A unique identifier for a registered event listener.
    ///
    /// Remains valid until the listener is removed via
    /// [`Document::remove_listener`](crate::Document::remove_listener).
    pub struct ListenerId;
}

/// The kinds of events the document can deliver.
///
/// This is a closed set: the engine subscribes to exactly the signals it
/// needs, and hosts drive them through the state-changing methods on
/// [`Document`](crate::Document) rather than by synthesizing events directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The pointer entered an element (fired per element whose hover state
    /// changed; does not bubble).
    MouseEnter,
    /// The pointer left an element (fired per element whose hover state
    /// changed; does not bubble).
    MouseLeave,
    /// A pointer was pressed on an element (bubbles along the ancestor
    /// chain).
    PointerDown,
    /// A pointer was released. Delivered to root-scoped listeners only, so
    /// a release outside the pressed element is still observed.
    PointerUp,
    /// An element gained keyboard focus.
    FocusIn,
    /// An element lost keyboard focus.
    FocusOut,
    /// The host's native transition engine finished animating a property.
    TransitionEnd,
}

/// A delivered event.
#[derive(Debug, Clone)]
pub struct Event {
    /// The element the event originated on.
    pub target: NodeId,
    /// What happened.
    pub kind: EventKind,
    /// For [`EventKind::TransitionEnd`], the CSS property that finished.
    pub property: Option<String>,
}

impl Event {
    pub(crate) fn new(target: NodeId, kind: EventKind) -> Self {
        Self {
            target,
            kind,
            property: None,
        }
    }

    pub(crate) fn transition_end(target: NodeId, property: impl Into<String>) -> Self {
        Self {
            target,
            kind: EventKind::TransitionEnd,
            property: Some(property.into()),
        }
    }
}

/// Callback invoked when a matching event is dispatched.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerScope {
    /// Attached to a specific element.
    Element(NodeId),
    /// Attached to the document root.
    Root,
}

/// A registered listener.
pub(crate) struct ListenerData {
    pub scope: ListenerScope,
    pub kind: EventKind,
    pub callback: EventCallback,
}
