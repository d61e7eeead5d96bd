//! Frame scheduler for animation callbacks.
//!
//! The scheduler is the document's stand-in for `requestAnimationFrame`:
//! callbacks are queued with [`FrameScheduler::request`] and drained by the
//! host calling [`FrameScheduler::run`] with the current timestamp. The
//! scheduler holds no wall clock of its own, so tests drive animations by
//! supplying timestamps explicitly.
//!
//! Callbacks are one-shot. A callback that wants the next frame re-requests
//! itself; re-requests made while a frame is running land in the *next*
//! frame, never the current one.

use std::time::Duration;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a pending frame request.
    pub struct FrameRequestId;
}

/// Callback invoked with the frame timestamp.
pub type FrameCallback = std::sync::Arc<dyn Fn(Duration) + Send + Sync>;

#[derive(Default)]
struct FrameState {
    pending: SlotMap<FrameRequestId, FrameCallback>,
    /// Request order; ids already cancelled are skipped on run.
    order: Vec<FrameRequestId>,
}

/// Queues animation-frame callbacks until the host runs a frame.
#[derive(Default)]
pub struct FrameScheduler {
    state: Mutex<FrameState>,
}

impl FrameScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a callback for the next frame.
    pub fn request(&self, callback: FrameCallback) -> FrameRequestId {
        let mut state = self.state.lock();
        let id = state.pending.insert(callback);
        state.order.push(id);
        id
    }

    /// Cancel a pending request. Cancelling an already-run or unknown
    /// request is a no-op.
    pub fn cancel(&self, id: FrameRequestId) {
        self.state.lock().pending.remove(id);
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Run one frame at the given timestamp.
    ///
    /// Drains the queue as it stood when the call was made and invokes each
    /// callback with `now`. Callbacks may call [`request`](Self::request)
    /// again; those run on the following frame.
    pub fn run(&self, now: Duration) {
        let callbacks: Vec<FrameCallback> = {
            let mut state = self.state.lock();
            let order = std::mem::take(&mut state.order);
            order
                .into_iter()
                .filter_map(|id| state.pending.remove(id))
                .collect()
        };

        for callback in callbacks {
            callback(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_callbacks_in_request_order() {
        let scheduler = FrameScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            scheduler.request(Arc::new(move |_| log.lock().push(i)));
        }

        scheduler.run(Duration::from_millis(16));
        assert_eq!(*log.lock(), vec![0, 1, 2]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn cancelled_request_does_not_run() {
        let scheduler = FrameScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired2 = fired.clone();
        let id = scheduler.request(Arc::new(move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        }));
        scheduler.cancel(id);
        scheduler.run(Duration::ZERO);

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rerequest_lands_in_next_frame() {
        let scheduler = Arc::new(FrameScheduler::new());
        let count = Arc::new(AtomicUsize::new(0));

        let sched = scheduler.clone();
        let count2 = count.clone();
        scheduler.request(Arc::new(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
            let count3 = count2.clone();
            sched.request(Arc::new(move |_| {
                count3.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        scheduler.run(Duration::from_millis(16));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        scheduler.run(Duration::from_millis(32));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
