//! Committing resolved values to an element's inline style.
//!
//! The [`Applier`] owns everything per-element the write path needs:
//! the transform sub-function list and the in-flight transition registry.
//! At most one transition is live per `(element, property)` pair; starting
//! a new one finalizes the old one first, firing its `on_end` exactly once.
//!
//! User callbacks triggered from inside an evaluation pass (`on_start`,
//! and `on_end` of a superseded transition) are *deferred*: the binding
//! drains them after the pass, so a callback may safely re-enter the
//! engine.

pub mod easing;
pub mod transform;
pub(crate) mod transition;

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use horizon_stylex_dom::{Document, EventKind, NodeId};

use crate::value::{CssValue, Settings, StyleCallback};

use transition::{ActiveTransition, Finalizer, PhysicalAnimation, TransitionKind};

type TransitionRegistry = Arc<Mutex<HashMap<String, ActiveTransition>>>;

/// Per-element style writer.
pub(crate) struct Applier {
    document: Document,
    element: NodeId,
    transforms: transform::TransformList,
    transitions: TransitionRegistry,
    token_counter: u64,
    deferred: Vec<StyleCallback>,
}

impl Applier {
    pub fn new(document: Document, element: NodeId) -> Self {
        Self {
            document,
            element,
            transforms: transform::TransformList::default(),
            transitions: Arc::new(Mutex::new(HashMap::new())),
            token_counter: 0,
            deferred: Vec::new(),
        }
    }

    /// Commit one resolved property value. `None` removes the property.
    ///
    /// `init` marks the first evaluation for the element: values apply
    /// discretely regardless of settings.
    pub fn apply(
        &mut self,
        property: &str,
        value: Option<&CssValue>,
        settings: Option<&Settings>,
        init: bool,
    ) {
        if transform::is_transform_property(property) {
            self.apply_transform(property, value, settings, init);
        } else {
            self.apply_plain(property, value, settings, init);
        }
    }

    /// Callbacks queued during [`apply`](Self::apply) calls, for the caller
    /// to invoke once it holds no engine locks.
    pub fn take_deferred(&mut self) -> Vec<StyleCallback> {
        std::mem::take(&mut self.deferred)
    }

    /// Finalize every in-flight transition (the discrete finalize path).
    pub fn teardown(&mut self) {
        let taken: Vec<ActiveTransition> = {
            let mut transitions = self.transitions.lock();
            transitions.drain().map(|(_, active)| active).collect()
        };
        for active in taken {
            active.teardown(&self.document);
            if let Some(on_end) = active.finalizer.finish() {
                self.deferred.push(on_end);
            }
        }
    }

    // -----------------------------------------------------------------
    // Ordinary properties
    // -----------------------------------------------------------------

    fn apply_plain(
        &mut self,
        property: &str,
        value: Option<&CssValue>,
        settings: Option<&Settings>,
        init: bool,
    ) {
        self.cancel_transition(property);

        let Some(value) = value else {
            self.document.remove_style_property(self.element, property);
            return;
        };
        let text = value.to_string();

        if let Some((duration, settings)) = animatable(settings, init) {
            let timing = timing_text(duration, settings);
            transition::register_native(&self.document, self.element, property, &timing);

            let token = self.next_token();
            let finalizer = Finalizer::new(
                native_finalize_action(self.document.clone(), self.element, property.to_string()),
                settings.on_end.clone(),
            );
            let listener = self.document.add_listener(
                self.element,
                EventKind::TransitionEnd,
                transition_end_callback(
                    Arc::downgrade(&self.transitions),
                    self.document.clone(),
                    self.element,
                    property.to_string(),
                    token,
                ),
            );
            self.transitions.lock().insert(
                property.to_string(),
                ActiveTransition {
                    token,
                    kind: TransitionKind::Native { listener },
                    finalizer,
                },
            );
            if let Some(on_start) = settings.on_start.clone() {
                self.deferred.push(on_start);
            }
        }

        self.document.set_style_property(self.element, property, text);
    }

    // -----------------------------------------------------------------
    // Transform sub-functions
    // -----------------------------------------------------------------

    fn apply_transform(
        &mut self,
        property: &str,
        value: Option<&CssValue>,
        settings: Option<&Settings>,
        init: bool,
    ) {
        let function = transform::css_function_name(property);
        let custom = transform::custom_property_name(&function);

        self.cancel_transition(property);

        let Some(value) = value else {
            if self.transforms.remove(&function) {
                self.document.remove_style_property(self.element, &custom);
                if self.transforms.is_empty() {
                    self.document.remove_style_property(self.element, "transform");
                } else {
                    self.document
                        .set_style_property(self.element, "transform", self.transforms.render());
                }
            }
            return;
        };
        let text = value.to_string();

        let current = self.document.style_property(self.element, &custom);
        if self.transforms.upsert(&function) {
            self.document
                .set_style_property(self.element, "transform", self.transforms.render());
        }

        let Some((duration, settings)) = animatable(settings, init) else {
            self.document.set_style_property(self.element, &custom, text);
            return;
        };

        match interpolation_plan(&function, current.as_deref(), &text) {
            Some((from, to, unit)) => {
                self.document.set_style_property(
                    self.element,
                    &custom,
                    transform::format_scalar(from, &unit),
                );
                let token = self.next_token();
                let finalizer = Finalizer::new(
                    physical_finalize_action(
                        self.document.clone(),
                        self.element,
                        custom.clone(),
                        to,
                        unit.clone(),
                    ),
                    settings.on_end.clone(),
                );
                let animation = Arc::new(PhysicalAnimation::new(
                    self.document.clone(),
                    self.element,
                    custom,
                    from,
                    to,
                    unit,
                    duration,
                    settings.easing.unwrap_or_default(),
                ));
                animation.schedule(completion_callback(
                    Arc::downgrade(&self.transitions),
                    self.document.clone(),
                    self.element,
                    property.to_string(),
                    token,
                ));
                self.transitions.lock().insert(
                    property.to_string(),
                    ActiveTransition {
                        token,
                        kind: TransitionKind::Physical { animation },
                        finalizer,
                    },
                );
                if let Some(on_start) = settings.on_start.clone() {
                    self.deferred.push(on_start);
                }
            }
            None => {
                // Units are incompatible (or the value is not a scalar):
                // skip interpolation and complete discretely.
                tracing::debug!(property, "transform values are not interpolable");
                self.document.set_style_property(self.element, &custom, text);
                if let Some(on_start) = settings.on_start.clone() {
                    self.deferred.push(on_start);
                }
                if let Some(on_end) = settings.on_end.clone() {
                    self.deferred.push(on_end);
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------

    fn next_token(&mut self) -> u64 {
        self.token_counter += 1;
        self.token_counter
    }

    /// Finalize any in-flight transition for `property`, deferring its
    /// `on_end`.
    fn cancel_transition(&mut self, property: &str) {
        let taken = self.transitions.lock().remove(property);
        if let Some(active) = taken {
            active.teardown(&self.document);
            if let Some(on_end) = active.finalizer.finish() {
                self.deferred.push(on_end);
            }
        }
    }
}

/// A change animates only when settings request it and this is not the
/// initialization pass.
fn animatable<'a>(settings: Option<&'a Settings>, init: bool) -> Option<(Duration, &'a Settings)> {
    if init {
        return None;
    }
    let settings = settings?;
    settings.duration.map(|duration| (duration, settings))
}

fn timing_text(duration: Duration, settings: &Settings) -> String {
    match settings.easing {
        Some(easing) => format!("{}ms {}", duration.as_millis(), easing.css_name()),
        None => format!("{}ms", duration.as_millis()),
    }
}

/// Plan a physical interpolation: both sides must parse as scalars with the
/// same unit; an absent current side defaults per sub-function.
fn interpolation_plan(
    function: &str,
    current: Option<&str>,
    target: &str,
) -> Option<(f64, f64, String)> {
    let (to, unit) = transform::parse_scalar(target)?;
    match current {
        None => Some((transform::default_scalar(function), to, unit)),
        Some(current) => {
            let (from, current_unit) = transform::parse_scalar(current)?;
            (current_unit == unit).then_some((from, to, unit))
        }
    }
}

fn native_finalize_action(
    doc: Document,
    element: NodeId,
    property: String,
) -> Box<dyn FnOnce() + Send> {
    Box::new(move || {
        transition::unregister_native(&doc, element, &property);
    })
}

fn physical_finalize_action(
    doc: Document,
    element: NodeId,
    custom_property: String,
    to: f64,
    unit: String,
) -> Box<dyn FnOnce() + Send> {
    Box::new(move || {
        doc.set_style_property(element, &custom_property, transform::format_scalar(to, &unit));
    })
}

/// Complete the transition identified by `token`, if it is still the live
/// one for `property`. Runs outside engine locks, so `on_end` is invoked
/// directly.
fn complete_transition(
    registry: &Weak<Mutex<HashMap<String, ActiveTransition>>>,
    doc: &Document,
    element: NodeId,
    property: &str,
    token: u64,
) {
    let Some(registry) = registry.upgrade() else {
        return;
    };
    let taken = {
        let mut transitions = registry.lock();
        match transitions.get(property) {
            Some(active) if active.token == token => transitions.remove(property),
            _ => None,
        }
    };
    if let Some(active) = taken {
        active.teardown(doc);
        if let Some(on_end) = active.finalizer.finish() {
            on_end(doc, element);
        }
    }
}

fn transition_end_callback(
    registry: Weak<Mutex<HashMap<String, ActiveTransition>>>,
    doc: Document,
    element: NodeId,
    property: String,
    token: u64,
) -> horizon_stylex_dom::EventCallback {
    Arc::new(move |event| {
        if event.property.as_deref() == Some(property.as_str()) {
            complete_transition(&registry, &doc, element, &property, token);
        }
    })
}

fn completion_callback(
    registry: Weak<Mutex<HashMap<String, ActiveTransition>>>,
    doc: Document,
    element: NodeId,
    property: String,
    token: u64,
) -> Arc<dyn Fn() + Send + Sync> {
    Arc::new(move || {
        complete_transition(&registry, &doc, element, &property, token);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup() -> (Document, NodeId, Applier) {
        let doc = Document::new();
        let el = doc.create_element("div");
        let applier = Applier::new(doc.clone(), el);
        (doc, el, applier)
    }

    fn run_deferred(doc: &Document, el: NodeId, applier: &mut Applier) {
        for callback in applier.take_deferred() {
            callback(doc, el);
        }
    }

    #[test]
    fn plain_set_and_remove() {
        let (doc, el, mut applier) = setup();
        applier.apply("color", Some(&"red".into()), None, true);
        assert_eq!(doc.style_property(el, "color").as_deref(), Some("red"));

        applier.apply("color", None, None, false);
        assert_eq!(doc.style_property(el, "color"), None);
    }

    #[test]
    fn transform_aggregates_in_first_applied_order() {
        let (doc, el, mut applier) = setup();
        applier.apply("transform-translate-x", Some(&"10px".into()), None, true);
        applier.apply("transform-scale", Some(&"2".into()), None, true);

        assert_eq!(
            doc.style_property(el, "transform").as_deref(),
            Some("translateX(var(--transform-translateX)) scale(var(--transform-scale))")
        );
        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("10px")
        );
        assert_eq!(doc.style_property(el, "--transform-scale").as_deref(), Some("2"));

        // Updating a value does not re-render the aggregate order.
        applier.apply("transform-translate-x", Some(&"20px".into()), None, false);
        assert_eq!(
            doc.style_property(el, "transform").as_deref(),
            Some("translateX(var(--transform-translateX)) scale(var(--transform-scale))")
        );
        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("20px")
        );
    }

    #[test]
    fn transform_removal_drops_tuple_and_custom_property() {
        let (doc, el, mut applier) = setup();
        applier.apply("transform-translate-x", Some(&"10px".into()), None, true);
        applier.apply("transform-scale", Some(&"2".into()), None, true);

        applier.apply("transform-translate-x", None, None, false);
        assert_eq!(
            doc.style_property(el, "transform").as_deref(),
            Some("scale(var(--transform-scale))")
        );
        assert_eq!(doc.style_property(el, "--transform-translateX"), None);

        applier.apply("transform-scale", None, None, false);
        assert_eq!(doc.style_property(el, "transform"), None);
    }

    #[test]
    fn init_pass_never_animates() {
        let (doc, el, mut applier) = setup();
        let settings = Settings::transition(300);
        applier.apply("width", Some(&"10px".into()), Some(&settings), true);

        assert_eq!(doc.style_property(el, "transition"), None);
        assert_eq!(doc.style_property(el, "width").as_deref(), Some("10px"));
    }

    #[test]
    fn native_transition_registers_and_clears_on_transition_end() {
        let (doc, el, mut applier) = setup();
        applier.apply("width", Some(&"10px".into()), None, true);

        let ended = Arc::new(AtomicUsize::new(0));
        let ended2 = ended.clone();
        let settings = Settings::transition(300)
            .with_easing(easing::Easing::EaseIn)
            .with_on_end(Arc::new(move |_, _| {
                ended2.fetch_add(1, Ordering::SeqCst);
            }));
        applier.apply("width", Some(&"20px".into()), Some(&settings), false);
        run_deferred(&doc, el, &mut applier);

        assert_eq!(
            doc.style_property(el, "transition").as_deref(),
            Some("width 300ms ease-in")
        );
        assert_eq!(doc.style_property(el, "width").as_deref(), Some("20px"));
        assert_eq!(ended.load(Ordering::SeqCst), 0);

        // A different property finishing is not ours.
        doc.dispatch_transition_end(el, "color");
        assert_eq!(ended.load(Ordering::SeqCst), 0);

        doc.dispatch_transition_end(el, "width");
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(doc.style_property(el, "transition"), None);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn superseding_transition_finalizes_predecessor_once() {
        let (doc, el, mut applier) = setup();
        applier.apply("width", Some(&"10px".into()), None, true);

        let first_ends = Arc::new(AtomicUsize::new(0));
        let first_ends2 = first_ends.clone();
        let first = Settings::transition(300).with_on_end(Arc::new(move |_, _| {
            first_ends2.fetch_add(1, Ordering::SeqCst);
        }));
        applier.apply("width", Some(&"20px".into()), Some(&first), false);
        run_deferred(&doc, el, &mut applier);

        let second_ends = Arc::new(AtomicUsize::new(0));
        let second_ends2 = second_ends.clone();
        let second = Settings::transition(100).with_on_end(Arc::new(move |_, _| {
            second_ends2.fetch_add(1, Ordering::SeqCst);
        }));
        applier.apply("width", Some(&"30px".into()), Some(&second), false);
        run_deferred(&doc, el, &mut applier);

        // Superseding finalized the first exactly once.
        assert_eq!(first_ends.load(Ordering::SeqCst), 1);

        // The second completing does not re-fire the first.
        doc.dispatch_transition_end(el, "width");
        assert_eq!(first_ends.load(Ordering::SeqCst), 1);
        assert_eq!(second_ends.load(Ordering::SeqCst), 1);

        // No stale listeners or shorthand entries remain.
        assert_eq!(doc.listener_count(), 0);
        assert_eq!(doc.style_property(el, "transition"), None);
    }

    #[test]
    fn physical_transition_interpolates_custom_property() {
        let (doc, el, mut applier) = setup();
        applier.apply("transform-translate-x", Some(&"0px".into()), None, true);

        let ended = Arc::new(AtomicUsize::new(0));
        let ended2 = ended.clone();
        let settings = Settings::transition(100).with_on_end(Arc::new(move |_, _| {
            ended2.fetch_add(1, Ordering::SeqCst);
        }));
        applier.apply("transform-translate-x", Some(&"100px".into()), Some(&settings), false);
        run_deferred(&doc, el, &mut applier);

        doc.frames().run(Duration::from_millis(0));
        doc.frames().run(Duration::from_millis(50));
        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("50px")
        );

        doc.frames().run(Duration::from_millis(100));
        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("100px")
        );
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(doc.frames().pending(), 0);
    }

    #[test]
    fn incompatible_units_complete_discretely() {
        let (doc, el, mut applier) = setup();
        applier.apply("transform-translate-x", Some(&"10px".into()), None, true);

        let ended = Arc::new(AtomicUsize::new(0));
        let ended2 = ended.clone();
        let settings = Settings::transition(100).with_on_end(Arc::new(move |_, _| {
            ended2.fetch_add(1, Ordering::SeqCst);
        }));
        applier.apply("transform-translate-x", Some(&"50%".into()), Some(&settings), false);
        run_deferred(&doc, el, &mut applier);

        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("50%")
        );
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(doc.frames().pending(), 0);
    }

    #[test]
    fn absent_current_side_defaults_per_function() {
        let (doc, el, mut applier) = setup();

        // First application of a scale with a transition: starts from 1.
        let settings = Settings::transition(100);
        applier.apply("transform-scale", Some(&"3".into()), Some(&settings), false);
        assert_eq!(doc.style_property(el, "--transform-scale").as_deref(), Some("1"));

        doc.frames().run(Duration::from_millis(0));
        doc.frames().run(Duration::from_millis(50));
        assert_eq!(doc.style_property(el, "--transform-scale").as_deref(), Some("2"));
    }

    #[test]
    fn teardown_finalizes_in_flight_transitions() {
        let (doc, el, mut applier) = setup();
        applier.apply("transform-translate-x", Some(&"0px".into()), None, true);

        let ended = Arc::new(AtomicUsize::new(0));
        let ended2 = ended.clone();
        let settings = Settings::transition(100).with_on_end(Arc::new(move |_, _| {
            ended2.fetch_add(1, Ordering::SeqCst);
        }));
        applier.apply("transform-translate-x", Some(&"100px".into()), Some(&settings), false);
        run_deferred(&doc, el, &mut applier);

        applier.teardown();
        run_deferred(&doc, el, &mut applier);

        // Finalized to the end state, exactly once, with no frames left.
        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("100px")
        );
        doc.frames().run(Duration::from_millis(50));
        assert_eq!(
            doc.style_property(el, "--transform-translateX").as_deref(),
            Some("100px")
        );
    }
}
