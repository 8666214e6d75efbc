//! Native Event Pool
//!
//! A bounded free-list of [`NativeEvent`] records. The native bridge posts at
//! interrupt-like frequency, so events are recycled instead of allocated per
//! post. The capacity bound is a drop policy, not an error: returning an
//! event to a full pool simply frees it.

use std::sync::{Mutex, PoisonError};

use crate::event::NativeEvent;

/// Default number of events kept for reuse.
pub const DEFAULT_POOL_SIZE: usize = 32;

/// Bounded free-list of cleared events.
#[derive(Debug)]
pub struct NativeEventPool {
    capacity: usize,
    free: Mutex<Vec<NativeEvent>>,
}

impl NativeEventPool {
    /// Pool with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_SIZE)
    }

    /// Pool holding at most `capacity` recycled events.
    pub fn with_capacity(capacity: usize) -> Self {
        NativeEventPool {
            capacity,
            free: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Take an event for filling. Pops a recycled (already cleared) event if
    /// one is available, otherwise allocates fresh. Never blocks, never fails.
    pub fn get(&self) -> NativeEvent {
        self.lock().pop().unwrap_or_default()
    }

    /// Return an event for reuse.
    ///
    /// Every slot is cleared before the event becomes visible to the next
    /// `get`. If the pool is already at capacity the event is dropped.
    pub fn put_back(&self, mut event: NativeEvent) {
        event.clear();
        let mut free = self.lock();
        if free.len() < self.capacity {
            free.push(event);
        } else {
            tracing::trace!(capacity = self.capacity, "event pool full, dropping event");
        }
    }

    /// Number of events currently held for reuse.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no recycled events are available.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NativeEvent>> {
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NativeEventPool {
    fn default() -> Self {
        Self::new()
    }
}
