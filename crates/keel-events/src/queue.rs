//! Event Queue
//!
//! The central FIFO between native producers and managed listeners: a
//! dispatch table mapping type codes to listeners, a pending-event queue with
//! one dedicated dispatch thread, and the shared event pool.
//!
//! There is no global queue. An `EventQueue` is constructed explicitly, one
//! per execution context, and handed to consumers at construction time.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::config::QueueConfig;
use crate::error::EventError;
use crate::event::NativeEvent;
use crate::listener::EventListener;
use crate::pool::NativeEventPool;
use crate::types::EventType;

/// Outcome of a [`EventQueue::post`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    /// Accepted and appended to the FIFO.
    Queued,
    /// Rejected by the listener's `preprocess` (or the listener panicked).
    Vetoed,
    /// No listener is registered for the event's type code; dropped.
    NoListener,
}

/// Per-type-code slot in the dispatch table.
#[derive(Default)]
struct DispatchData {
    listener: Option<Arc<dyn EventListener>>,
    /// Stamp of the most recent accepted-but-undelivered event of this type.
    /// The event itself stays owned by the FIFO; the stamp only names it.
    waiting: Option<u64>,
}

/// Everything guarded by the queue mutex.
struct QueueState {
    fifo: VecDeque<NativeEvent>,
    /// Indexed by `code - 1`. Grown on demand, never shrunk.
    table: Vec<DispatchData>,
    /// Next post stamp; starts at 1 so 0 always means "never posted".
    next_seq: u64,
}

struct Shared {
    state: Mutex<QueueState>,
    /// Wakes the dispatch thread after an enqueue or at shutdown.
    work: Condvar,
    alive: AtomicBool,
    pool: Arc<NativeEventPool>,
}

/// The native/VM event bridge.
///
/// `post` may be called from any thread; `process` callbacks run on the one
/// dispatch thread, so delivery order is globally FIFO across all type codes.
pub struct EventQueue {
    shared: Arc<Shared>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl EventQueue {
    /// Queue with default configuration. Dispatch does not run until
    /// [`start`](Self::start) is called; events posted before that wait.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Queue with explicit tunables.
    pub fn with_config(config: QueueConfig) -> Self {
        let mut table = Vec::new();
        table.resize_with(config.initial_table_len, DispatchData::default);
        EventQueue {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState {
                    fifo: VecDeque::new(),
                    table,
                    next_seq: 1,
                }),
                work: Condvar::new(),
                alive: AtomicBool::new(false),
                pool: Arc::new(NativeEventPool::with_capacity(config.pool_size)),
            }),
            dispatcher: Mutex::new(None),
        }
    }

    /// The event pool producers draw from. Shared with the native bridge.
    pub fn pool(&self) -> &Arc<NativeEventPool> {
        &self.shared.pool
    }

    /// Register `listener` for `kind`.
    ///
    /// Grows the dispatch table when `kind` exceeds its current length;
    /// growth preserves every existing registration and waiting stamp.
    /// Re-registering a code overwrites the previous listener (last write
    /// wins). One listener instance may serve many codes.
    pub fn register(
        &self,
        kind: EventType,
        listener: Arc<dyn EventListener>,
    ) -> Result<(), EventError> {
        if !kind.is_valid() {
            return Err(EventError::InvalidType { code: kind.code() });
        }
        let mut state = self.lock_state();
        let idx = kind.index();
        if state.table.len() <= idx {
            state.table.resize_with(idx + 1, DispatchData::default);
        }
        state.table[idx].listener = Some(listener);
        tracing::debug!(code = kind.code(), "event listener registered");
        Ok(())
    }

    /// Whether a listener is registered for `kind`.
    pub fn registered(&self, kind: EventType) -> bool {
        let state = self.lock_state();
        state
            .table
            .get(kind.index())
            .is_some_and(|dd| dd.listener.is_some())
    }

    /// Hand an event to the bridge. Safe to call from any thread; nothing
    /// escapes this call (a panicking `preprocess` counts as a veto).
    ///
    /// The registered listener's `preprocess` runs synchronously here, on the
    /// calling thread, with the still-pending event of the same type (if any)
    /// available for in-place coalescing. Vetoed and unroutable events are
    /// recycled into the pool.
    pub fn post(&self, mut event: NativeEvent) -> PostStatus {
        let kind = event.kind();
        if !kind.is_valid() {
            tracing::debug!("dropping event with reserved type code 0");
            return PostStatus::NoListener;
        }

        let mut state = self.lock_state();
        let idx = kind.index();

        // The shutdown marker needs no listener and skips preprocess.
        if kind == EventType::EVENT_QUEUE_SHUTDOWN {
            Self::enqueue(&mut state, idx, event);
            drop(state);
            self.shared.work.notify_one();
            return PostStatus::Queued;
        }

        let st = &mut *state;
        let Some(listener) = st
            .table
            .get(idx)
            .and_then(|dd| dd.listener.as_ref().map(Arc::clone))
        else {
            drop(state);
            tracing::debug!(code = kind.code(), "no listener for event type, dropping");
            self.shared.pool.put_back(event);
            return PostStatus::NoListener;
        };

        let waiting = match st.table[idx].waiting {
            Some(seq) => st.fifo.iter_mut().rev().find(|ev| ev.seq() == seq),
            None => None,
        };
        let accepted =
            panic::catch_unwind(AssertUnwindSafe(|| listener.preprocess(&mut event, waiting)))
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        code = kind.code(),
                        "listener panicked in preprocess, vetoing event"
                    );
                    false
                });
        if !accepted {
            drop(state);
            tracing::trace!(code = kind.code(), "event vetoed by preprocess");
            self.shared.pool.put_back(event);
            return PostStatus::Vetoed;
        }

        Self::enqueue(&mut state, idx, event);
        drop(state);
        self.shared.work.notify_one();
        PostStatus::Queued
    }

    /// Start the dispatch thread.
    pub fn start(&self) -> Result<(), EventError> {
        let mut dispatcher = self.lock_dispatcher();
        if dispatcher.is_some() {
            return Err(EventError::AlreadyStarted);
        }
        self.shared.alive.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let handle = std::thread::Builder::new()
            .name("keel-event-dispatch".into())
            .spawn(move || dispatch_loop(&shared))?;
        *dispatcher = Some(handle);
        Ok(())
    }

    /// Stop dispatching and join the dispatch thread.
    ///
    /// The loop exits after finishing any event currently in `process`.
    /// `post` still accepts events afterwards; they are simply never drained.
    pub fn shutdown(&self) -> Result<(), EventError> {
        let handle = self.lock_dispatcher().take();
        self.shared.alive.store(false, Ordering::SeqCst);
        self.shared.work.notify_all();
        match handle {
            Some(handle) => {
                if handle.join().is_err() {
                    tracing::error!("dispatch thread terminated by panic");
                }
                Ok(())
            }
            None => Err(EventError::NotStarted),
        }
    }

    /// Post an [`EVENT_QUEUE_SHUTDOWN`](EventType::EVENT_QUEUE_SHUTDOWN)
    /// event; the dispatch loop stops once it reaches the head of the FIFO,
    /// after every event posted before it has been delivered.
    pub fn send_shutdown_event(&self) {
        let mut event = self.shared.pool.get();
        event.set_kind(EventType::EVENT_QUEUE_SHUTDOWN);
        self.post(event);
    }

    /// Whether the dispatch loop is running.
    pub fn is_alive(&self) -> bool {
        self.shared.alive.load(Ordering::SeqCst)
    }

    /// Number of events pending delivery.
    pub fn pending(&self) -> usize {
        self.lock_state().fifo.len()
    }

    /// Stamp of the pending event of type `kind`, if one is waiting.
    pub fn waiting_seq(&self, kind: EventType) -> Option<u64> {
        self.lock_state().table.get(kind.index())?.waiting
    }

    fn enqueue(state: &mut QueueState, idx: usize, mut event: NativeEvent) {
        let seq = state.next_seq;
        state.next_seq += 1;
        event.stamp(seq);
        state.fifo.push_back(event);
        if let Some(dd) = state.table.get_mut(idx) {
            dd.waiting = Some(seq);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_dispatcher(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.dispatcher.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventQueue {
    fn drop(&mut self) {
        self.shared.alive.store(false, Ordering::SeqCst);
        self.shared.work.notify_all();
        if let Some(handle) = self.lock_dispatcher().take() {
            let _ = handle.join();
        }
    }
}

/// Consumer side: drain the FIFO in order while alive.
fn dispatch_loop(shared: &Shared) {
    tracing::debug!("event dispatch loop running");
    loop {
        let mut state = shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (event, listener) = loop {
            if !shared.alive.load(Ordering::SeqCst) {
                tracing::debug!("event dispatch loop stopping");
                return;
            }
            if let Some(event) = state.fifo.pop_front() {
                let st = &mut *state;
                let listener = st.table.get_mut(event.kind().index()).and_then(|dd| {
                    // The head is now in flight, not waiting - unless a newer
                    // post already superseded it.
                    if dd.waiting == Some(event.seq()) {
                        dd.waiting = None;
                    }
                    dd.listener.as_ref().map(Arc::clone)
                });
                break (event, listener);
            }
            state = shared
                .work
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        };
        drop(state);

        if event.kind() == EventType::EVENT_QUEUE_SHUTDOWN {
            tracing::info!("shutdown event processed, stopping dispatch");
            shared.alive.store(false, Ordering::SeqCst);
            shared.pool.put_back(event);
            return;
        }

        if let Some(listener) = listener {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.process(&event)));
            if outcome.is_err() {
                tracing::error!(
                    code = event.kind().code(),
                    "listener panicked in process, continuing"
                );
            }
        }
        shared.pool.put_back(event);
    }
}
