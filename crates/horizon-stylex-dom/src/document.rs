//! The document: an element tree with live state.
//!
//! [`Document`] is a cheap-clone handle (`Arc` internally) over a
//! mutex-protected element tree. Elements carry a tag, ordered attributes,
//! an ordered inline-style declaration list, and live pseudo-state flags.
//!
//! State-changing methods mirror how a real host mutates a page:
//!
//! - [`Document::set_hover_target`] moves the hover chain (target plus
//!   ancestors) and emits `MouseEnter`/`MouseLeave` per element whose flag
//!   changed.
//! - [`Document::pointer_down`] flags the pressed chain active and bubbles
//!   `PointerDown`; [`Document::pointer_up`] clears every active flag and
//!   notifies root-scoped listeners, so a release outside the pressed
//!   element still clears state.
//! - [`Document::set_attribute`] fires attribute observers only when the
//!   value actually changes.
//!
//! Callbacks are always invoked after the tree lock is released, so a
//! listener may freely read or mutate the document.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::events::{Event, EventCallback, EventKind, ListenerData, ListenerId, ListenerScope};
use crate::frame::FrameScheduler;
use crate::media::MediaRegistry;
use crate::observer::{AttributeCallback, ObserverData, ObserverId};

new_key_type! {
    /// A unique identifier for an element in a [`Document`].
    pub struct NodeId;
}

#[derive(Default)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Ordered attribute list (insertion order).
    attributes: Vec<(String, String)>,
    /// Ordered inline-style declarations (first-set order).
    style: Vec<(String, String)>,
    hovered: bool,
    active: bool,
    focused: bool,
}

#[derive(Default)]
struct Tree {
    nodes: SlotMap<NodeId, NodeData>,
    listeners: SlotMap<ListenerId, ListenerData>,
    observers: SlotMap<ObserverId, ObserverData>,
    /// Current hover chain, innermost first.
    hover_chain: Vec<NodeId>,
    /// Current active (pressed) chain, innermost first.
    active_chain: Vec<NodeId>,
    focused: Option<NodeId>,
}

impl Tree {
    fn ancestor_chain(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(data) = self.nodes.get(id) else {
                break;
            };
            chain.push(id);
            current = data.parent;
        }
        chain
    }

    fn listeners_for(&self, scope: ListenerScope, kind: EventKind) -> Vec<EventCallback> {
        self.listeners
            .values()
            .filter(|l| l.scope == scope && l.kind == kind)
            .map(|l| l.callback.clone())
            .collect()
    }
}

struct DocumentShared {
    tree: Mutex<Tree>,
    media: MediaRegistry,
    frames: FrameScheduler,
}

/// Handle to an in-memory document.
///
/// Clones share the same underlying tree, media registry, and frame
/// scheduler.
#[derive(Clone)]
pub struct Document {
    shared: Arc<DocumentShared>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(DocumentShared {
                tree: Mutex::new(Tree::default()),
                media: MediaRegistry::new(),
                frames: FrameScheduler::new(),
            }),
        }
    }

    /// The document's media query registry.
    pub fn media(&self) -> &MediaRegistry {
        &self.shared.media
    }

    /// The document's frame scheduler.
    pub fn frames(&self) -> &FrameScheduler {
        &self.shared.frames
    }

    // ---------------------------------------------------------------------
    // Tree structure
    // ---------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
        let mut tree = self.shared.tree.lock();
        tree.nodes.insert(NodeData {
            tag: tag.into(),
            ..NodeData::default()
        })
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is detached from it first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut tree = self.shared.tree.lock();
        if !tree.nodes.contains_key(parent) || !tree.nodes.contains_key(child) {
            tracing::warn!("append_child on a removed node");
            return;
        }
        if let Some(old_parent) = tree.nodes[child].parent {
            let siblings = &mut tree.nodes[old_parent].children;
            siblings.retain(|c| *c != child);
        }
        tree.nodes[child].parent = Some(parent);
        tree.nodes[parent].children.push(child);
    }

    /// Detach an element and drop its entire subtree, along with any
    /// listeners and observers attached within it.
    pub fn remove(&self, node: NodeId) {
        let mut tree = self.shared.tree.lock();
        if !tree.nodes.contains_key(node) {
            return;
        }
        if let Some(parent) = tree.nodes[node].parent {
            let siblings = &mut tree.nodes[parent].children;
            siblings.retain(|c| *c != node);
        }

        let mut doomed = vec![node];
        let mut index = 0;
        while index < doomed.len() {
            let id = doomed[index];
            index += 1;
            if let Some(data) = tree.nodes.get(id) {
                doomed.extend(data.children.iter().copied());
            }
        }
        for id in &doomed {
            tree.nodes.remove(*id);
        }
        tree.listeners.retain(|_, l| match l.scope {
            ListenerScope::Element(el) => !doomed.contains(&el),
            ListenerScope::Root => true,
        });
        tree.observers.retain(|_, o| !doomed.contains(&o.target));
        tree.hover_chain.retain(|id| !doomed.contains(id));
        tree.active_chain.retain(|id| !doomed.contains(id));
        if tree.focused.is_some_and(|f| doomed.contains(&f)) {
            tree.focused = None;
        }
    }

    /// Whether the element still exists.
    pub fn contains(&self, node: NodeId) -> bool {
        self.shared.tree.lock().nodes.contains_key(node)
    }

    /// The element's tag name.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.shared.tree.lock().nodes.get(node).map(|n| n.tag.clone())
    }

    /// The element's parent, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.shared.tree.lock().nodes.get(node).and_then(|n| n.parent)
    }

    /// The element's children, in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.shared
            .tree
            .lock()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Set an attribute, firing attribute observers when the value changes.
    pub fn set_attribute(&self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let observers = {
            let mut tree = self.shared.tree.lock();
            let Some(data) = tree.nodes.get_mut(node) else {
                tracing::warn!(attribute = %name, "set_attribute on a removed node");
                return;
            };
            match data.attributes.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) if *existing == value => return,
                Some((_, existing)) => *existing = value,
                None => data.attributes.push((name.clone(), value)),
            }
            observers_for(&tree, node)
        };
        for observer in observers {
            observer(&name);
        }
    }

    /// Remove an attribute, firing attribute observers if it was present.
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        let observers = {
            let mut tree = self.shared.tree.lock();
            let Some(data) = tree.nodes.get_mut(node) else {
                return;
            };
            let before = data.attributes.len();
            data.attributes.retain(|(n, _)| n != name);
            if data.attributes.len() == before {
                return;
            }
            observers_for(&tree, node)
        };
        for observer in observers {
            observer(name);
        }
    }

    /// Read an attribute value.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.shared.tree.lock().nodes.get(node).and_then(|n| {
            n.attributes
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value.clone())
        })
    }

    /// Whether the element carries an attribute, regardless of value.
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.shared
            .tree
            .lock()
            .nodes
            .get(node)
            .is_some_and(|n| n.attributes.iter().any(|(attr, _)| attr == name))
    }

    /// Watch an element's attributes. The callback receives the mutated
    /// attribute's name.
    pub fn observe_attributes(&self, node: NodeId, callback: AttributeCallback) -> ObserverId {
        self.shared
            .tree
            .lock()
            .observers
            .insert(ObserverData { target: node, callback })
    }

    /// Disconnect an attribute observer. Unknown ids are a no-op.
    pub fn disconnect_observer(&self, id: ObserverId) {
        self.shared.tree.lock().observers.remove(id);
    }

    // ---------------------------------------------------------------------
    // Inline style
    // ---------------------------------------------------------------------

    /// Set an inline-style declaration. First-set order is preserved across
    /// value updates.
    pub fn set_style_property(&self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut tree = self.shared.tree.lock();
        let Some(data) = tree.nodes.get_mut(node) else {
            tracing::warn!(property = %name, "set_style_property on a removed node");
            return;
        };
        match data.style.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => data.style.push((name, value)),
        }
    }

    /// Remove an inline-style declaration.
    pub fn remove_style_property(&self, node: NodeId, name: &str) {
        let mut tree = self.shared.tree.lock();
        if let Some(data) = tree.nodes.get_mut(node) {
            data.style.retain(|(n, _)| n != name);
        }
    }

    /// Read an inline-style declaration.
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.shared.tree.lock().nodes.get(node).and_then(|n| {
            n.style
                .iter()
                .find(|(prop, _)| prop == name)
                .map(|(_, value)| value.clone())
        })
    }

    /// The element's full inline-style text, e.g. `"color: red; width: 2px;"`.
    pub fn style_text(&self, node: NodeId) -> String {
        self.shared
            .tree
            .lock()
            .nodes
            .get(node)
            .map(|n| {
                n.style
                    .iter()
                    .map(|(name, value)| format!("{name}: {value};"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Nearest ancestor-or-self carrying `name="value"`.
    pub fn closest_with_attribute(&self, node: NodeId, name: &str, value: &str) -> Option<NodeId> {
        let tree = self.shared.tree.lock();
        let mut current = Some(node);
        while let Some(id) = current {
            let data = tree.nodes.get(id)?;
            if data
                .attributes
                .iter()
                .any(|(attr, v)| attr == name && v == value)
            {
                return Some(id);
            }
            current = data.parent;
        }
        None
    }

    /// First descendant (depth-first, document order, excluding `node`
    /// itself) carrying `name="value"`.
    pub fn descendant_with_attribute(&self, node: NodeId, name: &str, value: &str) -> Option<NodeId> {
        let tree = self.shared.tree.lock();
        let mut stack: Vec<NodeId> = tree
            .nodes
            .get(node)?
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            let Some(data) = tree.nodes.get(id) else {
                continue;
            };
            if data
                .attributes
                .iter()
                .any(|(attr, v)| attr == name && v == value)
            {
                return Some(id);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        None
    }

    // ---------------------------------------------------------------------
    // Pseudo-state
    // ---------------------------------------------------------------------

    /// Whether the pointer is currently over the element (or a descendant).
    pub fn is_hovered(&self, node: NodeId) -> bool {
        self.shared.tree.lock().nodes.get(node).is_some_and(|n| n.hovered)
    }

    /// Whether a pointer is currently pressed on the element (or a
    /// descendant).
    pub fn is_active(&self, node: NodeId) -> bool {
        self.shared.tree.lock().nodes.get(node).is_some_and(|n| n.active)
    }

    /// Whether the element has keyboard focus.
    pub fn is_focused(&self, node: NodeId) -> bool {
        self.shared.tree.lock().nodes.get(node).is_some_and(|n| n.focused)
    }

    /// Move the pointer over `target` (or off every element with `None`).
    ///
    /// The target and all its ancestors become hovered. Every element whose
    /// flag changed receives `MouseLeave` (departures first, innermost
    /// first) or `MouseEnter` (outermost first).
    pub fn set_hover_target(&self, target: Option<NodeId>) {
        let events = {
            let mut tree = self.shared.tree.lock();
            let new_chain = target.map(|t| tree.ancestor_chain(t)).unwrap_or_default();
            let old_chain = std::mem::take(&mut tree.hover_chain);

            let mut events = Vec::new();
            for id in &old_chain {
                if !new_chain.contains(id) {
                    if let Some(data) = tree.nodes.get_mut(*id) {
                        data.hovered = false;
                        events.push(Event::new(*id, EventKind::MouseLeave));
                    }
                }
            }
            for id in new_chain.iter().rev() {
                if !old_chain.contains(id) {
                    if let Some(data) = tree.nodes.get_mut(*id) {
                        data.hovered = true;
                        events.push(Event::new(*id, EventKind::MouseEnter));
                    }
                }
            }
            tree.hover_chain = new_chain;
            collect_element_dispatches(&tree, events)
        };
        run_dispatches(events);
    }

    /// Press a pointer on `target`.
    ///
    /// The target chain becomes active and `PointerDown` bubbles from the
    /// target through its ancestors.
    pub fn pointer_down(&self, target: NodeId) {
        let dispatches = {
            let mut tree = self.shared.tree.lock();
            if !tree.nodes.contains_key(target) {
                tracing::warn!("pointer_down on a removed node");
                return;
            }
            let chain = tree.ancestor_chain(target);
            for id in &chain {
                if let Some(data) = tree.nodes.get_mut(*id) {
                    data.active = true;
                }
            }
            tree.active_chain = chain.clone();

            let event = Event::new(target, EventKind::PointerDown);
            let mut dispatches = Vec::new();
            for id in &chain {
                for callback in tree.listeners_for(ListenerScope::Element(*id), EventKind::PointerDown) {
                    dispatches.push((callback, event.clone()));
                }
            }
            dispatches
        };
        run_dispatches(dispatches);
    }

    /// Release the pointer, wherever it is.
    ///
    /// Clears every active flag and notifies root-scoped `PointerUp`
    /// listeners.
    pub fn pointer_up(&self) {
        let dispatches = {
            let mut tree = self.shared.tree.lock();
            let chain = std::mem::take(&mut tree.active_chain);
            let released_on = chain.first().copied();
            for id in chain {
                if let Some(data) = tree.nodes.get_mut(id) {
                    data.active = false;
                }
            }
            let target = match released_on {
                Some(id) => id,
                // Release with nothing pressed still notifies listeners.
                None => NodeId::default(),
            };
            let event = Event::new(target, EventKind::PointerUp);
            tree.listeners_for(ListenerScope::Root, EventKind::PointerUp)
                .into_iter()
                .map(|callback| (callback, event.clone()))
                .collect::<Vec<_>>()
        };
        run_dispatches(dispatches);
    }

    /// Move keyboard focus to `target` (or clear it with `None`).
    pub fn set_focus(&self, target: Option<NodeId>) {
        let dispatches = {
            let mut tree = self.shared.tree.lock();
            let previous = tree.focused;
            if previous == target {
                return;
            }
            let mut events = Vec::new();
            if let Some(prev) = previous {
                if let Some(data) = tree.nodes.get_mut(prev) {
                    data.focused = false;
                    events.push(Event::new(prev, EventKind::FocusOut));
                }
            }
            if let Some(next) = target {
                if let Some(data) = tree.nodes.get_mut(next) {
                    data.focused = true;
                    events.push(Event::new(next, EventKind::FocusIn));
                }
            }
            tree.focused = target;
            collect_element_dispatches(&tree, events)
        };
        run_dispatches(dispatches);
    }

    /// Report that the host's native transition engine finished animating
    /// `property` on `node`. Delivers `TransitionEnd` to that element's
    /// listeners.
    pub fn dispatch_transition_end(&self, node: NodeId, property: &str) {
        let dispatches = {
            let tree = self.shared.tree.lock();
            let event = Event::transition_end(node, property);
            tree.listeners_for(ListenerScope::Element(node), EventKind::TransitionEnd)
                .into_iter()
                .map(|callback| (callback, event.clone()))
                .collect::<Vec<_>>()
        };
        run_dispatches(dispatches);
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    /// Listen for `kind` events on an element.
    pub fn add_listener(&self, node: NodeId, kind: EventKind, callback: EventCallback) -> ListenerId {
        self.shared.tree.lock().listeners.insert(ListenerData {
            scope: ListenerScope::Element(node),
            kind,
            callback,
        })
    }

    /// Listen for `kind` events at document scope (used for `PointerUp`).
    pub fn add_root_listener(&self, kind: EventKind, callback: EventCallback) -> ListenerId {
        self.shared.tree.lock().listeners.insert(ListenerData {
            scope: ListenerScope::Root,
            kind,
            callback,
        })
    }

    /// Remove a listener. Unknown ids are a no-op.
    pub fn remove_listener(&self, id: ListenerId) {
        self.shared.tree.lock().listeners.remove(id);
    }

    /// Total number of registered listeners (diagnostics and tests).
    pub fn listener_count(&self) -> usize {
        self.shared.tree.lock().listeners.len()
    }

    /// Total number of attribute observers (diagnostics and tests).
    pub fn observer_count(&self) -> usize {
        self.shared.tree.lock().observers.len()
    }
}

fn observers_for(tree: &Tree, node: NodeId) -> Vec<AttributeCallback> {
    tree.observers
        .values()
        .filter(|o| o.target == node)
        .map(|o| o.callback.clone())
        .collect()
}

fn collect_element_dispatches(tree: &Tree, events: Vec<Event>) -> Vec<(EventCallback, Event)> {
    let mut dispatches = Vec::new();
    for event in events {
        for callback in tree.listeners_for(ListenerScope::Element(event.target), event.kind) {
            dispatches.push((callback, event.clone()));
        }
    }
    dispatches
}

fn run_dispatches(dispatches: Vec<(EventCallback, Event)>) {
    for (callback, event) in dispatches {
        callback(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn small_tree(doc: &Document) -> (NodeId, NodeId, NodeId) {
        let root = doc.create_element("div");
        let middle = doc.create_element("div");
        let leaf = doc.create_element("span");
        doc.append_child(root, middle);
        doc.append_child(middle, leaf);
        (root, middle, leaf)
    }

    #[test]
    fn attributes_round_trip() {
        let doc = Document::new();
        let el = doc.create_element("div");

        doc.set_attribute(el, "data-stylex-id", "a");
        assert_eq!(doc.attribute(el, "data-stylex-id").as_deref(), Some("a"));
        assert!(doc.has_attribute(el, "data-stylex-id"));

        doc.remove_attribute(el, "data-stylex-id");
        assert!(!doc.has_attribute(el, "data-stylex-id"));
    }

    #[test]
    fn style_preserves_first_set_order() {
        let doc = Document::new();
        let el = doc.create_element("div");

        doc.set_style_property(el, "color", "red");
        doc.set_style_property(el, "width", "2px");
        doc.set_style_property(el, "color", "blue");

        assert_eq!(doc.style_text(el), "color: blue; width: 2px;");
    }

    #[test]
    fn closest_is_inclusive() {
        let doc = Document::new();
        let (root, _, leaf) = small_tree(&doc);
        doc.set_attribute(root, "data-stylex-id", "a");
        doc.set_attribute(leaf, "data-stylex-id", "b");

        assert_eq!(doc.closest_with_attribute(leaf, "data-stylex-id", "b"), Some(leaf));
        assert_eq!(doc.closest_with_attribute(leaf, "data-stylex-id", "a"), Some(root));
        assert_eq!(doc.closest_with_attribute(leaf, "data-stylex-id", "c"), None);
    }

    #[test]
    fn descendant_search_is_document_order() {
        let doc = Document::new();
        let root = doc.create_element("div");
        let first = doc.create_element("div");
        let second = doc.create_element("div");
        doc.append_child(root, first);
        doc.append_child(root, second);
        doc.set_attribute(first, "data-stylex-id", "x");
        doc.set_attribute(second, "data-stylex-id", "x");

        assert_eq!(
            doc.descendant_with_attribute(root, "data-stylex-id", "x"),
            Some(first)
        );
    }

    #[test]
    fn hover_chain_flags_ancestors() {
        let doc = Document::new();
        let (root, middle, leaf) = small_tree(&doc);

        doc.set_hover_target(Some(leaf));
        assert!(doc.is_hovered(root));
        assert!(doc.is_hovered(middle));
        assert!(doc.is_hovered(leaf));

        doc.set_hover_target(Some(middle));
        assert!(doc.is_hovered(middle));
        assert!(!doc.is_hovered(leaf));

        doc.set_hover_target(None);
        assert!(!doc.is_hovered(root));
    }

    #[test]
    fn hover_events_fire_only_on_change() {
        let doc = Document::new();
        let (_, middle, leaf) = small_tree(&doc);
        let enters = Arc::new(AtomicUsize::new(0));

        let enters2 = enters.clone();
        doc.add_listener(
            middle,
            EventKind::MouseEnter,
            Arc::new(move |_| {
                enters2.fetch_add(1, Ordering::SeqCst);
            }),
        );

        doc.set_hover_target(Some(middle));
        // Moving deeper keeps the middle element hovered: no second enter.
        doc.set_hover_target(Some(leaf));
        assert_eq!(enters.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pointer_down_bubbles_and_pointer_up_clears() {
        let doc = Document::new();
        let (root, _, leaf) = small_tree(&doc);
        let downs = Arc::new(AtomicUsize::new(0));
        let ups = Arc::new(AtomicUsize::new(0));

        let downs2 = downs.clone();
        doc.add_listener(
            root,
            EventKind::PointerDown,
            Arc::new(move |_| {
                downs2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let ups2 = ups.clone();
        doc.add_root_listener(
            EventKind::PointerUp,
            Arc::new(move |_| {
                ups2.fetch_add(1, Ordering::SeqCst);
            }),
        );

        doc.pointer_down(leaf);
        assert_eq!(downs.load(Ordering::SeqCst), 1);
        assert!(doc.is_active(root));

        doc.pointer_up();
        assert_eq!(ups.load(Ordering::SeqCst), 1);
        assert!(!doc.is_active(root));
        assert!(!doc.is_active(leaf));
    }

    #[test]
    fn attribute_observer_fires_on_change_only() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen2 = seen.clone();
        let id = doc.observe_attributes(
            el,
            Arc::new(move |name| {
                seen2.lock().push(name.to_string());
            }),
        );

        doc.set_attribute(el, "data-stylex-state", "on");
        doc.set_attribute(el, "data-stylex-state", "on"); // unchanged
        doc.set_attribute(el, "data-stylex-state", "off");
        doc.disconnect_observer(id);
        doc.set_attribute(el, "data-stylex-state", "on");

        assert_eq!(
            *seen.lock(),
            vec!["data-stylex-state".to_string(), "data-stylex-state".to_string()]
        );
    }

    #[test]
    fn remove_drops_subtree_and_listeners() {
        let doc = Document::new();
        let (root, middle, leaf) = small_tree(&doc);
        doc.add_listener(leaf, EventKind::MouseEnter, Arc::new(|_| {}));
        assert_eq!(doc.listener_count(), 1);

        doc.remove(middle);
        assert!(doc.contains(root));
        assert!(!doc.contains(middle));
        assert!(!doc.contains(leaf));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn focus_moves_between_elements() {
        let doc = Document::new();
        let (_, a, b) = small_tree(&doc);

        doc.set_focus(Some(a));
        assert!(doc.is_focused(a));

        doc.set_focus(Some(b));
        assert!(!doc.is_focused(a));
        assert!(doc.is_focused(b));
    }
}
