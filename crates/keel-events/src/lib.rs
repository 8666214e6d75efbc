//! Keel Event Bridge
//!
//! The synchronization point between the host VM's native layer and managed
//! application code: a single-consumer FIFO with a bounded, reusable native
//! event pool and a per-type-code listener table.
//!
//! Producers (native input sources, other threads) obtain a [`NativeEvent`]
//! from the queue's pool, fill its fixed parameter slots and hand it to
//! [`EventQueue::post`]. The registered [`EventListener`] for that type code
//! gets a synchronous `preprocess` call on the producer's thread (accept,
//! veto, or coalesce into the still-pending event of the same type); accepted
//! events are drained in global FIFO order by one dedicated dispatch thread,
//! which calls `process` and then recycles the event.

mod config;
mod error;
mod event;
mod listener;
mod pool;
mod queue;
mod types;

pub use config::QueueConfig;
pub use error::EventError;
pub use event::{INT_PARAMS, NativeEvent, STRING_PARAMS};
pub use listener::EventListener;
pub use pool::{DEFAULT_POOL_SIZE, NativeEventPool};
pub use queue::{EventQueue, PostStatus};
pub use types::EventType;
