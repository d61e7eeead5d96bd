//! Listener wiring for the selectors a style value map references.
//!
//! The manager inspects a map, extracts every distinct selector component,
//! and establishes the minimal set of listeners needed to learn that
//! "something this value depends on changed":
//!
//! - media queries share one registry watcher per distinct normalized
//!   query (reference-counted across elements by the registry)
//! - `:hover` listens for enter/leave on the resolved target
//! - `:active` latches on pointer-down and clears on a root-scoped
//!   pointer-up, so a release outside the element still clears state
//! - attribute selectors observe the resolved target's mutations,
//!   re-evaluating only when the specific synthesized attribute changes
//! - booleans need no subscription
//!
//! Hierarchy targets resolve once, at wiring time. A target that does not
//! exist contributes no listener and is skipped silently: the matcher
//! would re-resolve on every evaluation, but nothing will ever trigger
//! one for that selector.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use horizon_stylex_dom::{Document, EventKind, ListenerId, MediaWatcherId, NodeId, ObserverId};

use crate::resolve::resolve_hierarchy;
use crate::selector::{PseudoClass, Selector, SelectorKind};
use crate::value::{PropertyValue, StyleValueMap, ValueEntry};
use crate::STATE_ATTRIBUTE_PREFIX;

/// Callback that re-runs the owning binding's evaluation.
pub type RerenderCallback = Arc<dyn Fn() + Send + Sync>;

/// When the listener set is (re)computed.
///
/// `FirstEvaluation` freezes the set at the first map an element ever
/// evaluates — the observed behavior of the system this engine models.
/// `DiffEachEvaluation` re-syncs on every pass: new selector shapes gain
/// listeners, vanished ones lose them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionPolicy {
    /// Wire once, from the first-seen map.
    #[default]
    FirstEvaluation,
    /// Recompute the desired set on every evaluation and diff it against
    /// the held set.
    DiffEachEvaluation,
}

/// Identity of one subscription: condition kind plus resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SubscriptionKey {
    Media(String),
    Hover(NodeId),
    Active(NodeId),
    Focus(NodeId),
    /// Target element and full synthesized attribute name.
    Attribute(NodeId, String),
}

enum SubscriptionHandle {
    Media(MediaWatcherId),
    Listeners(Vec<ListenerId>),
    Observer(ObserverId),
}

/// The listener set held on behalf of one bound element.
pub(crate) struct Subscriptions {
    document: Document,
    element: NodeId,
    active: HashMap<SubscriptionKey, SubscriptionHandle>,
}

impl Subscriptions {
    pub fn new(document: Document, element: NodeId) -> Self {
        Self {
            document,
            element,
            active: HashMap::new(),
        }
    }

    /// Bring the held listener set up to date with `map`.
    ///
    /// Missing subscriptions are always added; stale ones are removed only
    /// when `remove_stale` is set (the diffing policy).
    pub fn sync(&mut self, map: &StyleValueMap, rerender: &RerenderCallback, remove_stale: bool) {
        let desired = self.desired_keys(map);

        if remove_stale {
            let stale: Vec<SubscriptionKey> = self
                .active
                .keys()
                .filter(|key| !desired.contains(key))
                .cloned()
                .collect();
            for key in stale {
                if let Some(handle) = self.active.remove(&key) {
                    self.release(handle);
                }
            }
        }

        for key in desired {
            if !self.active.contains_key(&key) {
                let handle = self.wire(&key, rerender);
                self.active.insert(key, handle);
            }
        }
    }

    /// Release every held listener. Idempotent.
    pub fn teardown(&mut self) {
        let held: Vec<SubscriptionHandle> = self.active.drain().map(|(_, handle)| handle).collect();
        for handle in held {
            self.release(handle);
        }
    }

    /// Number of held subscriptions (tests and diagnostics).
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// The subscriptions `map` calls for, in first-reference order,
    /// de-duplicated. Unresolvable hierarchy targets are skipped here.
    fn desired_keys(&self, map: &StyleValueMap) -> Vec<SubscriptionKey> {
        let mut keys = Vec::new();
        for (_, value) in map.iter() {
            let PropertyValue::Dynamic(entries) = value else {
                continue;
            };
            for entry in entries {
                let ValueEntry::Conditional { selectors, .. } = entry else {
                    continue;
                };
                for selector in selectors.iter() {
                    if let Some(key) = self.key_for(selector) {
                        if !keys.contains(&key) {
                            keys.push(key);
                        }
                    }
                }
            }
        }
        keys
    }

    fn key_for(&self, selector: &Selector) -> Option<SubscriptionKey> {
        // Boolean and media conditions are not element-scoped; everything
        // else needs its hierarchy target resolved now.
        if let SelectorKind::Boolean(_) = selector.kind {
            return None;
        }
        if let SelectorKind::Media(query) = &selector.kind {
            return Some(SubscriptionKey::Media(query.trim().to_string()));
        }

        let target = match &selector.hierarchy {
            Some(hierarchy) => match resolve_hierarchy(&self.document, hierarchy, self.element) {
                Some(target) => target,
                None => {
                    tracing::debug!(selector = %selector, "hierarchy target not found; selector stays unsubscribed");
                    return None;
                }
            },
            None => self.element,
        };

        match &selector.kind {
            SelectorKind::Pseudo(pseudo) => Some(match pseudo {
                PseudoClass::Hover => SubscriptionKey::Hover(target),
                PseudoClass::Active => SubscriptionKey::Active(target),
                PseudoClass::Focus => SubscriptionKey::Focus(target),
            }),
            SelectorKind::Attribute { name, .. } => Some(SubscriptionKey::Attribute(
                target,
                format!("{STATE_ATTRIBUTE_PREFIX}{name}"),
            )),
            SelectorKind::Boolean(_) | SelectorKind::Media(_) => unreachable!("handled above"),
        }
    }

    fn wire(&self, key: &SubscriptionKey, rerender: &RerenderCallback) -> SubscriptionHandle {
        let doc = &self.document;
        match key {
            SubscriptionKey::Media(query) => {
                let rerender = rerender.clone();
                SubscriptionHandle::Media(
                    doc.media().subscribe(query, Arc::new(move || rerender())),
                )
            }
            SubscriptionKey::Hover(target) => {
                let enter = rerender.clone();
                let leave = rerender.clone();
                SubscriptionHandle::Listeners(vec![
                    doc.add_listener(*target, EventKind::MouseEnter, Arc::new(move |_| enter())),
                    doc.add_listener(*target, EventKind::MouseLeave, Arc::new(move |_| leave())),
                ])
            }
            SubscriptionKey::Active(target) => {
                // Pressed latch: set on the target, cleared by a release
                // anywhere in the document.
                let latch = Arc::new(AtomicBool::new(false));
                let down_latch = latch.clone();
                let down_rerender = rerender.clone();
                let up_rerender = rerender.clone();
                SubscriptionHandle::Listeners(vec![
                    doc.add_listener(
                        *target,
                        EventKind::PointerDown,
                        Arc::new(move |_| {
                            down_latch.store(true, Ordering::SeqCst);
                            down_rerender();
                        }),
                    ),
                    doc.add_root_listener(
                        EventKind::PointerUp,
                        Arc::new(move |_| {
                            if latch.swap(false, Ordering::SeqCst) {
                                up_rerender();
                            }
                        }),
                    ),
                ])
            }
            SubscriptionKey::Focus(target) => {
                let focus_in = rerender.clone();
                let focus_out = rerender.clone();
                SubscriptionHandle::Listeners(vec![
                    doc.add_listener(*target, EventKind::FocusIn, Arc::new(move |_| focus_in())),
                    doc.add_listener(*target, EventKind::FocusOut, Arc::new(move |_| focus_out())),
                ])
            }
            SubscriptionKey::Attribute(target, attribute) => {
                let rerender = rerender.clone();
                let attribute_name = attribute.clone();
                SubscriptionHandle::Observer(doc.observe_attributes(
                    *target,
                    Arc::new(move |mutated| {
                        // Only the specific synthesized attribute re-evaluates.
                        if mutated == attribute_name {
                            rerender();
                        }
                    }),
                ))
            }
        }
    }

    fn release(&self, handle: SubscriptionHandle) {
        match handle {
            SubscriptionHandle::Media(id) => self.document.media().unsubscribe(id),
            SubscriptionHandle::Listeners(ids) => {
                for id in ids {
                    self.document.remove_listener(id);
                }
            }
            SubscriptionHandle::Observer(id) => self.document.disconnect_observer(id),
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse;
    use crate::value::{PropertyValue, StyleValueMap, ValueEntry};
    use crate::ID_ATTRIBUTE;
    use std::sync::atomic::AtomicUsize;

    fn rerender_counter() -> (RerenderCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        (
            Arc::new(move || {
                count2.fetch_add(1, Ordering::SeqCst);
            }),
            count,
        )
    }

    fn dynamic(selector: &str) -> PropertyValue {
        PropertyValue::Dynamic(vec![
            ValueEntry::when(parse(selector).unwrap(), "red"),
            ValueEntry::fallback("blue"),
        ])
    }

    #[test]
    fn hover_subscription_rerenders_on_enter_and_leave() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, count) = rerender_counter();

        subs.sync(&StyleValueMap::new().with("color", dynamic(":hover")), &rerender, false);

        doc.set_hover_target(Some(el));
        doc.set_hover_target(None);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn active_latch_clears_on_release_anywhere() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, count) = rerender_counter();

        subs.sync(&StyleValueMap::new().with("color", dynamic(":active")), &rerender, false);

        doc.pointer_down(el);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        doc.pointer_up();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // A release with the latch already clear does not re-render.
        doc.pointer_up();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn attribute_observer_filters_to_its_attribute() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, count) = rerender_counter();

        subs.sync(&StyleValueMap::new().with("color", dynamic("@open")), &rerender, false);

        doc.set_attribute(el, "data-stylex-other", "1");
        assert_eq!(count.load(Ordering::SeqCst), 0);

        doc.set_attribute(el, "data-stylex-open", "1");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_selectors_share_one_subscription() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, _) = rerender_counter();

        let map = StyleValueMap::new()
            .with("color", dynamic(":hover"))
            .with("width", dynamic(":hover"));
        subs.sync(&map, &rerender, false);

        assert_eq!(subs.len(), 1);
        assert_eq!(doc.listener_count(), 2); // enter + leave
    }

    #[test]
    fn unresolvable_hierarchy_is_skipped() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, _) = rerender_counter();

        subs.sync(
            &StyleValueMap::new().with("color", dynamic("ghost>:hover")),
            &rerender,
            false,
        );
        assert_eq!(subs.len(), 0);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn hierarchy_target_resolves_at_wiring_time() {
        let doc = Document::new();
        let card = doc.create_element("div");
        let label = doc.create_element("span");
        doc.append_child(card, label);
        doc.set_attribute(card, ID_ATTRIBUTE, "card");

        let mut subs = Subscriptions::new(doc.clone(), label);
        let (rerender, count) = rerender_counter();
        subs.sync(
            &StyleValueMap::new().with("color", dynamic("card>:hover")),
            &rerender,
            false,
        );

        // The listener sits on the card, so hovering the card re-renders.
        doc.set_hover_target(Some(card));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn diff_sync_drops_stale_and_adds_new() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, _) = rerender_counter();

        subs.sync(&StyleValueMap::new().with("color", dynamic(":hover")), &rerender, false);
        assert_eq!(doc.listener_count(), 2);

        subs.sync(&StyleValueMap::new().with("color", dynamic("@open")), &rerender, true);
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.observer_count(), 1);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn teardown_is_idempotent_and_exhaustive() {
        let doc = Document::new();
        let el = doc.create_element("div");
        let mut subs = Subscriptions::new(doc.clone(), el);
        let (rerender, _) = rerender_counter();

        let map = StyleValueMap::new()
            .with("color", dynamic(":hover"))
            .with("width", dynamic("@media (max-width: 600px)"))
            .with("height", dynamic("@open"));
        subs.sync(&map, &rerender, false);
        assert!(doc.listener_count() > 0);
        assert_eq!(doc.media().watcher_count("(max-width: 600px)"), 1);

        subs.teardown();
        subs.teardown();
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.observer_count(), 0);
        assert_eq!(doc.media().watcher_count("(max-width: 600px)"), 0);
    }
}
