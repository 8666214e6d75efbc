//! Keel MIDP Listeners
//!
//! The managed-side consumers of the event bridge: gesture zone registration
//! and delivery, native AMS (application management system) requests, and
//! JSR-75 filesystem mount notifications. Each registers for its event type
//! codes on an explicitly provided [`EventQueue`](keel_events::EventQueue)
//! and reacts on the dispatch thread; none of them alters queue semantics.

mod ams;
mod fs_notify;
mod gesture;

pub use ams::{AmsError, ExecuteRequest, IsolateLauncher, MidletInfo, NativeAmsEventListener};
pub use fs_notify::{FileSystemEventHandler, RootListener, RootProvider};
pub use gesture::{
    GestureEvent, GestureKind, GestureListener, GestureRegistrationManager, Zone,
};
