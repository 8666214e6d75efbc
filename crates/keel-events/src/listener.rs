//! Event Listener
//!
//! The capability interface a subsystem implements to receive delivery.

use crate::event::NativeEvent;

/// A registered consumer of one or more event type codes.
///
/// `preprocess` runs synchronously on the producer's thread inside
/// [`EventQueue::post`](crate::EventQueue::post); it must be fast and must
/// not block on the dispatch thread. `process` runs exclusively on the
/// dispatch thread.
pub trait EventListener: Send + Sync {
    /// Decide whether `event` should be queued.
    ///
    /// `waiting` is the most recent event of the same type still pending
    /// delivery, if any. A listener may mutate it in place to coalesce
    /// (e.g. merge drag deltas) and return `false` to drop the new event.
    /// Returning `false` leaves the pending event untouched by the queue.
    fn preprocess(&self, event: &mut NativeEvent, waiting: Option<&mut NativeEvent>) -> bool {
        let _ = (event, waiting);
        true
    }

    /// React to a delivered event. The event is recycled once this returns.
    fn process(&self, event: &NativeEvent);
}
