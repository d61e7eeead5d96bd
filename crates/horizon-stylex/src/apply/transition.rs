//! Transition bookkeeping: the native `transition` shorthand, the physical
//! interpolation driver, and finalize-once plumbing.
//!
//! Two paths animate a property change:
//!
//! - **Native**: ordinary properties get an entry in the element's
//!   `transition` shorthand and the host's transition engine interpolates;
//!   a `TransitionEnd` event clears the entry.
//! - **Physical**: transform sub-functions animate through their custom
//!   property, one frame at a time, because the native engine cannot
//!   transition an individual `var()` inside `transform`.
//!
//! Either way a transition ends exactly once — naturally, by being
//! superseded, or at teardown — through a shared [`Finalizer`] that runs
//! its completion action and surrenders the `on_end` callback to whoever
//! finished it.

use std::time::Duration;

use parking_lot::Mutex;
use std::sync::Arc;

use horizon_stylex_dom::{Document, FrameRequestId, ListenerId, NodeId};

use crate::value::StyleCallback;

use super::easing::{lerp_eased, Easing};
use super::transform::format_scalar;

// ---------------------------------------------------------------------
// `transition` shorthand bookkeeping
// ---------------------------------------------------------------------

/// Parse a `transition` shorthand into `(property, timing)` entries, e.g.
/// `"width 300ms ease-in, color 100ms"`.
pub(crate) fn parse_shorthand(text: &str) -> Vec<(String, String)> {
    text.split(',')
        .filter_map(|part| {
            let part = part.trim();
            let (property, timing) = part.split_once(char::is_whitespace)?;
            Some((property.to_string(), timing.trim().to_string()))
        })
        .collect()
}

/// Serialize shorthand entries back to declaration text.
pub(crate) fn serialize_shorthand(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(property, timing)| format!("{property} {timing}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Add or update one property's timing in a shorthand entry list.
pub(crate) fn upsert_shorthand(entries: &mut Vec<(String, String)>, property: &str, timing: &str) {
    match entries.iter_mut().find(|(name, _)| name == property) {
        Some((_, existing)) => *existing = timing.to_string(),
        None => entries.push((property.to_string(), timing.to_string())),
    }
}

/// Update an element's `transition` declaration with one property's timing.
pub(crate) fn register_native(doc: &Document, element: NodeId, property: &str, timing: &str) {
    let mut entries = parse_shorthand(&doc.style_property(element, "transition").unwrap_or_default());
    upsert_shorthand(&mut entries, property, timing);
    doc.set_style_property(element, "transition", serialize_shorthand(&entries));
}

/// Drop one property from an element's `transition` declaration.
pub(crate) fn unregister_native(doc: &Document, element: NodeId, property: &str) {
    let mut entries = parse_shorthand(&doc.style_property(element, "transition").unwrap_or_default());
    entries.retain(|(name, _)| name != property);
    if entries.is_empty() {
        doc.remove_style_property(element, "transition");
    } else {
        doc.set_style_property(element, "transition", serialize_shorthand(&entries));
    }
}

// ---------------------------------------------------------------------
// Finalize-once
// ---------------------------------------------------------------------

/// One-shot completion of a transition.
///
/// Whichever path finishes first — natural completion, supersession, or
/// teardown — runs the completion action; every later call is a no-op and
/// yields no callback.
#[derive(Clone)]
pub(crate) struct Finalizer {
    slot: Arc<Mutex<Option<(Box<dyn FnOnce() + Send>, Option<StyleCallback>)>>>,
}

impl Finalizer {
    pub fn new(action: Box<dyn FnOnce() + Send>, on_end: Option<StyleCallback>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some((action, on_end)))),
        }
    }

    /// Run the completion action if it has not run yet; returns the
    /// `on_end` callback for the caller to invoke at a safe point.
    pub fn finish(&self) -> Option<StyleCallback> {
        let taken = self.slot.lock().take();
        taken.and_then(|(action, on_end)| {
            action();
            on_end
        })
    }
}

/// A live transition for one `(element, property)` pair.
pub(crate) struct ActiveTransition {
    /// Distinguishes this transition from successors under the same
    /// property key.
    pub token: u64,
    pub kind: TransitionKind,
    pub finalizer: Finalizer,
}

pub(crate) enum TransitionKind {
    /// Host-animated; we hold the `TransitionEnd` listener.
    Native { listener: ListenerId },
    /// Frame-driven interpolation of a custom property.
    Physical { animation: Arc<PhysicalAnimation> },
}

impl ActiveTransition {
    /// Release the transition's listener or stop its frames.
    pub fn teardown(&self, doc: &Document) {
        match &self.kind {
            TransitionKind::Native { listener } => doc.remove_listener(*listener),
            TransitionKind::Physical { animation } => animation.cancel(),
        }
    }
}

// ---------------------------------------------------------------------
// Physical interpolation
// ---------------------------------------------------------------------

struct PhysicalState {
    /// Timestamp of the first frame; progress is measured from here.
    start: Option<Duration>,
    frame: Option<FrameRequestId>,
    cancelled: bool,
}

/// Frame-driven numeric interpolation of a custom property.
pub(crate) struct PhysicalAnimation {
    document: Document,
    element: NodeId,
    custom_property: String,
    from: f64,
    to: f64,
    unit: String,
    duration: Duration,
    easing: Easing,
    state: Mutex<PhysicalState>,
}

impl PhysicalAnimation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        document: Document,
        element: NodeId,
        custom_property: String,
        from: f64,
        to: f64,
        unit: String,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            document,
            element,
            custom_property,
            from,
            to,
            unit,
            duration,
            easing,
            state: Mutex::new(PhysicalState {
                start: None,
                frame: None,
                cancelled: false,
            }),
        }
    }

    /// Request the next frame. `completion` runs once the end value has
    /// been written.
    pub fn schedule(self: &Arc<Self>, completion: Arc<dyn Fn() + Send + Sync>) {
        let weak = Arc::downgrade(self);
        let id = self.document.frames().request(Arc::new(move |now| {
            if let Some(animation) = weak.upgrade() {
                animation.tick(now, &completion);
            }
        }));
        self.state.lock().frame = Some(id);
    }

    fn tick(self: &Arc<Self>, now: Duration, completion: &Arc<dyn Fn() + Send + Sync>) {
        let progress = {
            let mut state = self.state.lock();
            if state.cancelled {
                return;
            }
            state.frame = None;
            let start = *state.start.get_or_insert(now);
            if self.duration.is_zero() {
                1.0
            } else {
                let elapsed = now.checked_sub(start).unwrap_or_default();
                (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
            }
        };

        if progress >= 1.0 {
            self.document.set_style_property(
                self.element,
                &self.custom_property,
                format_scalar(self.to, &self.unit),
            );
            completion();
        } else {
            let value = lerp_eased(self.easing, self.from, self.to, progress);
            self.document.set_style_property(
                self.element,
                &self.custom_property,
                format_scalar(value, &self.unit),
            );
            self.schedule(completion.clone());
        }
    }

    /// Stop requesting frames; an already-delivered frame becomes a no-op.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancelled = true;
        if let Some(frame) = state.frame.take() {
            self.document.frames().cancel(frame);
        }
    }
}
