//! Filesystem Mount Notifications
//!
//! JSR-75 style disks-changed handling. The native layer posts a
//! `FC_DISKS_CHANGED_EVENT` whenever removable media comes or goes; the
//! handler re-reads the mounted root set from its [`RootProvider`], diffs it
//! against the last snapshot and tells every [`RootListener`] what appeared
//! or disappeared.
//!
//! Repeated notifications coalesce by veto: while one disks-changed event is
//! still pending, further ones are rejected in `preprocess` - the eventual
//! rescan will observe the cumulative state anyway.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use keel_events::{EventError, EventListener, EventQueue, EventType, NativeEvent};

/// Source of truth for currently mounted filesystem roots.
pub trait RootProvider: Send + Sync {
    fn mounted_roots(&self) -> Vec<String>;
}

/// Notified on the dispatch thread when roots appear or disappear.
pub trait RootListener: Send + Sync {
    fn root_added(&self, root: &str);
    fn root_removed(&self, root: &str);
}

struct FsState {
    roots: BTreeSet<String>,
    listeners: Vec<Arc<dyn RootListener>>,
}

/// Handler for disks-changed events; one per event queue.
pub struct FileSystemEventHandler {
    provider: Arc<dyn RootProvider>,
    state: Mutex<FsState>,
}

impl FileSystemEventHandler {
    /// Snapshot the provider's current roots and build the handler.
    pub fn new(provider: Arc<dyn RootProvider>) -> Arc<Self> {
        let roots = provider.mounted_roots().into_iter().collect();
        Arc::new(FileSystemEventHandler {
            provider,
            state: Mutex::new(FsState { roots, listeners: Vec::new() }),
        })
    }

    /// Register this handler for `FC_DISKS_CHANGED_EVENT` on `queue`.
    pub fn attach(self: &Arc<Self>, queue: &EventQueue) -> Result<(), EventError> {
        queue.register(EventType::FC_DISKS_CHANGED_EVENT, Arc::clone(self) as _)
    }

    pub fn add_listener(&self, listener: Arc<dyn RootListener>) {
        self.lock().listeners.push(listener);
    }

    /// The last observed root set, sorted.
    pub fn roots(&self) -> Vec<String> {
        self.lock().roots.iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventListener for FileSystemEventHandler {
    fn preprocess(&self, _event: &mut NativeEvent, waiting: Option<&mut NativeEvent>) -> bool {
        // One pending rescan covers any number of disk changes.
        waiting.is_none()
    }

    fn process(&self, _event: &NativeEvent) {
        let current: BTreeSet<String> = self.provider.mounted_roots().into_iter().collect();
        let (added, removed, listeners) = {
            let mut state = self.lock();
            let added: Vec<String> = current.difference(&state.roots).cloned().collect();
            let removed: Vec<String> = state.roots.difference(&current).cloned().collect();
            state.roots = current;
            (added, removed, state.listeners.clone())
        };
        if added.is_empty() && removed.is_empty() {
            return;
        }
        tracing::info!(added = added.len(), removed = removed.len(), "mounted roots changed");
        for listener in &listeners {
            for root in &added {
                listener.root_added(root);
            }
            for root in &removed {
                listener.root_removed(root);
            }
        }
    }
}
