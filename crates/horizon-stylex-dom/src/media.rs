//! Reference-counted media query registry.
//!
//! The registry plays the role `window.matchMedia` plays in a browser, as
//! an explicit service owned by the [`Document`](crate::Document):
//!
//! - The host reports query results with [`MediaRegistry::set_matches`];
//!   unknown queries read as `false`.
//! - Consumers subscribe per query string. Subscriptions to the same
//!   normalized query share one watcher entry; the entry disappears when
//!   the last subscriber leaves. [`MediaRegistry::watcher_count`] exposes
//!   the count so lifecycle behavior is testable.
//! - Watchers are notified only when a query's result actually flips.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a media query subscription.
    pub struct MediaWatcherId;
}

/// Callback invoked when the subscribed query's result changes.
pub type MediaCallback = Arc<dyn Fn() + Send + Sync>;

struct Watcher {
    query: String,
    callback: MediaCallback,
}

#[derive(Default)]
struct RegistryState {
    /// Current result per normalized query.
    results: HashMap<String, bool>,
    watchers: SlotMap<MediaWatcherId, Watcher>,
    /// Subscription ids per normalized query, in subscription order.
    by_query: HashMap<String, Vec<MediaWatcherId>>,
}

/// Media query results and change subscriptions for one document.
#[derive(Default)]
pub struct MediaRegistry {
    state: Mutex<RegistryState>,
}

impl MediaRegistry {
    /// Create an empty registry. Every query initially reads as `false`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a query for keying: surrounding whitespace is not
    /// significant.
    fn normalize(query: &str) -> &str {
        query.trim()
    }

    /// Current result for a query. Unknown queries read as `false`.
    pub fn matches(&self, query: &str) -> bool {
        self.state
            .lock()
            .results
            .get(Self::normalize(query))
            .copied()
            .unwrap_or(false)
    }

    /// Report a query result. Subscribers of that query are notified only
    /// when the result actually changes.
    pub fn set_matches(&self, query: &str, matches: bool) {
        let callbacks: Vec<MediaCallback> = {
            let mut state = self.state.lock();
            let key = Self::normalize(query).to_string();
            if state.results.get(&key) == Some(&matches) {
                return;
            }
            state.results.insert(key.clone(), matches);
            state
                .by_query
                .get(&key)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| state.watchers.get(*id))
                        .map(|w| w.callback.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        for callback in callbacks {
            callback();
        }
    }

    /// Subscribe to changes of a query's result.
    pub fn subscribe(&self, query: &str, callback: MediaCallback) -> MediaWatcherId {
        let mut state = self.state.lock();
        let key = Self::normalize(query).to_string();
        let id = state.watchers.insert(Watcher {
            query: key.clone(),
            callback,
        });
        state.by_query.entry(key).or_default().push(id);
        id
    }

    /// Drop a subscription. The watcher entry for the query disappears when
    /// its last subscriber leaves. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: MediaWatcherId) {
        let mut state = self.state.lock();
        let Some(watcher) = state.watchers.remove(id) else {
            return;
        };
        if let Some(ids) = state.by_query.get_mut(&watcher.query) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                state.by_query.remove(&watcher.query);
            }
        }
    }

    /// Number of live subscriptions for a query.
    pub fn watcher_count(&self, query: &str) -> usize {
        self.state
            .lock()
            .by_query
            .get(Self::normalize(query))
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const QUERY: &str = "(max-width: 600px)";

    fn counter_callback(count: &Arc<AtomicUsize>) -> MediaCallback {
        let count = count.clone();
        Arc::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn unknown_query_reads_false() {
        let registry = MediaRegistry::new();
        assert!(!registry.matches(QUERY));
    }

    #[test]
    fn notifies_only_on_flip() {
        let registry = MediaRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        registry.subscribe(QUERY, counter_callback(&count));

        registry.set_matches(QUERY, true);
        registry.set_matches(QUERY, true);
        registry.set_matches(QUERY, false);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shared_watcher_is_reference_counted() {
        let registry = MediaRegistry::new();
        let first = registry.subscribe(QUERY, Arc::new(|| {}));
        let second = registry.subscribe(format!("  {QUERY} ").as_str(), Arc::new(|| {}));
        assert_eq!(registry.watcher_count(QUERY), 2);

        registry.unsubscribe(first);
        assert_eq!(registry.watcher_count(QUERY), 1);

        registry.unsubscribe(second);
        assert_eq!(registry.watcher_count(QUERY), 0);
    }

    #[test]
    fn unsubscribed_watcher_stops_firing() {
        let registry = MediaRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let id = registry.subscribe(QUERY, counter_callback(&count));

        registry.set_matches(QUERY, true);
        registry.unsubscribe(id);
        registry.set_matches(QUERY, false);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
