//! The runtime driver: one element bound to a style value producer.
//!
//! A [`StyleBinding`] plays the role of the reactive framework's directive:
//! it is constructed with a *producer* closure that returns a fresh
//! [`StyleValueMap`] (maps carry no identity between evaluations), and it
//! re-runs that producer whenever one of the map's conditions changes.
//!
//! On the first evaluation, values apply discretely (no transitions) and
//! the subscription set is wired from that first map. Later evaluations
//! apply normally; under [`SubscriptionPolicy::DiffEachEvaluation`] the
//! subscription set is re-synced each pass as well.
//!
//! [`StyleBinding::refresh`] is the re-evaluation hook the reactive host
//! calls when its own tracked inputs change; it is safe to call repeatedly
//! with unchanged or changed maps, and safe to re-enter from `on_start`/
//! `on_end` callbacks (those run after the pass, outside engine locks).
//!
//! Dropping the binding (or calling [`StyleBinding::unbind`]) releases
//! every listener exactly once and finalizes in-flight transitions through
//! the discrete finalize path.

use std::sync::Arc;

use parking_lot::Mutex;

use horizon_stylex_dom::{Document, NodeId};

use crate::apply::Applier;
use crate::error::Result;
use crate::resolve::resolve_value;
use crate::subscribe::{RerenderCallback, SubscriptionPolicy, Subscriptions};
use crate::value::StyleValueMap;
use crate::ID_ATTRIBUTE;

/// Engine behavior knobs, passed at bind time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// When the subscription set is recomputed.
    pub policy: SubscriptionPolicy,
}

struct BindingState {
    subscriptions: Subscriptions,
    applier: Applier,
    initialized: bool,
    torn_down: bool,
}

struct BindingInner {
    document: Document,
    element: NodeId,
    producer: Box<dyn Fn() -> StyleValueMap + Send + Sync>,
    config: EngineConfig,
    state: Mutex<BindingState>,
}

/// A live binding between an element and a dynamic style value.
pub struct StyleBinding {
    inner: Arc<BindingInner>,
}

impl StyleBinding {
    /// Bind `element` to `producer` and run the first evaluation.
    ///
    /// Fails (before any document mutation) if the produced map is
    /// malformed.
    pub fn bind(
        document: &Document,
        element: NodeId,
        producer: impl Fn() -> StyleValueMap + Send + Sync + 'static,
        config: EngineConfig,
    ) -> Result<Self> {
        let inner = Arc::new(BindingInner {
            document: document.clone(),
            element,
            producer: Box::new(producer),
            config,
            state: Mutex::new(BindingState {
                subscriptions: Subscriptions::new(document.clone(), element),
                applier: Applier::new(document.clone(), element),
                initialized: false,
                torn_down: false,
            }),
        });
        refresh_inner(&inner)?;
        Ok(Self { inner })
    }

    /// The bound element.
    pub fn element(&self) -> NodeId {
        self.inner.element
    }

    /// Re-run the producer and apply the result.
    ///
    /// This is the hook the reactive host invokes when its own tracked
    /// inputs change; internal listeners call it too.
    pub fn refresh(&self) -> Result<()> {
        refresh_inner(&self.inner)
    }

    /// Release all listeners and finalize in-flight transitions.
    /// Idempotent; also runs on drop.
    pub fn unbind(&self) {
        let deferred = {
            let mut state = self.inner.state.lock();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            state.subscriptions.teardown();
            state.applier.teardown();
            state.applier.take_deferred()
        };
        for callback in deferred {
            callback(&self.inner.document, self.inner.element);
        }
    }
}

impl Drop for StyleBinding {
    fn drop(&mut self) {
        self.unbind();
    }
}

/// Write the stable identity attribute the matcher and compiler key on.
/// The markup front end normally does this; programmatic hosts call it
/// before binding.
pub fn assign_element_id(document: &Document, element: NodeId, id: &str) {
    document.set_attribute(element, ID_ATTRIBUTE, id);
}

fn refresh_inner(inner: &Arc<BindingInner>) -> Result<()> {
    // The producer runs outside all engine locks: it may read the document
    // or other reactive state freely.
    let map = (inner.producer)();
    map.validate()?;

    let deferred = {
        let mut state = inner.state.lock();
        if state.torn_down {
            return Ok(());
        }
        let init = !state.initialized;

        for (property, value) in map.iter() {
            match resolve_value(&inner.document, value, inner.element) {
                Some((resolved, settings)) => {
                    state
                        .applier
                        .apply(property, Some(resolved), settings, init);
                }
                None => state.applier.apply(property, None, None, init),
            }
        }

        if init {
            let rerender = rerender_callback(inner);
            state.subscriptions.sync(&map, &rerender, false);
            state.initialized = true;
        } else if inner.config.policy == SubscriptionPolicy::DiffEachEvaluation {
            let rerender = rerender_callback(inner);
            state.subscriptions.sync(&map, &rerender, true);
        }

        state.applier.take_deferred()
    };

    for callback in deferred {
        callback(&inner.document, inner.element);
    }
    Ok(())
}

fn rerender_callback(inner: &Arc<BindingInner>) -> RerenderCallback {
    let weak = Arc::downgrade(inner);
    Arc::new(move || {
        if let Some(inner) = weak.upgrade() {
            if let Err(error) = refresh_inner(&inner) {
                tracing::warn!(%error, "style re-evaluation failed");
            }
        }
    })
}
