//! Native AMS Requests
//!
//! Listener for application-management requests posted by the native system:
//! execute, resume, pause, destroy, foreground and info requests. The
//! listener only decodes the fixed slot layouts and delegates to an
//! [`IsolateLauncher`]; launching and tearing down isolates is the
//! collaborator's business.

use std::sync::Arc;

use keel_events::{EventError, EventListener, EventQueue, EventType, NativeEvent};

/// The native AMS request codes this listener serves.
const AMS_REQUEST_CODES: [EventType; 7] = [
    EventType::NATIVE_MIDLET_EXECUTE_REQUEST,
    EventType::NATIVE_MIDLET_RESUME_REQUEST,
    EventType::NATIVE_MIDLET_PAUSE_REQUEST,
    EventType::NATIVE_MIDLET_DESTROY_REQUEST,
    EventType::NATIVE_MIDLET_GETINFO_REQUEST,
    EventType::NATIVE_SET_FOREGROUND_REQUEST,
    EventType::SET_FOREGROUND_BY_NAME_REQUEST,
];

/// A decoded execute request.
///
/// Slots: int1 = external app id, int2 = suite id, string1 = class name,
/// string2 = display name, string3..string5 = arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteRequest {
    pub app_id: i32,
    pub suite_id: i32,
    pub class_name: String,
    pub display_name: Option<String>,
    pub args: Vec<String>,
}

impl ExecuteRequest {
    fn decode(event: &NativeEvent) -> Option<Self> {
        Some(ExecuteRequest {
            app_id: event.int_param(1),
            suite_id: event.int_param(2),
            class_name: event.string_param(1)?.to_owned(),
            display_name: event.string_param(2).map(str::to_owned),
            args: (3..=5)
                .filter_map(|n| event.string_param(n).map(str::to_owned))
                .collect(),
        })
    }
}

/// Information reported back for a get-info request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidletInfo {
    pub suite_id: i32,
    pub class_name: String,
    pub running: bool,
}

/// Errors from the isolate launcher collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AmsError {
    #[error("unknown application id {0}")]
    UnknownApp(i32),
    #[error("application {0} is not running")]
    NotRunning(i32),
    #[error("launch failed: {0}")]
    Launch(String),
}

/// The AMS side of the bridge: schedules applications in isolates.
///
/// Treated as an opaque external collaborator; calls run on the dispatch
/// thread and must not block indefinitely.
pub trait IsolateLauncher: Send + Sync {
    fn execute(&self, request: &ExecuteRequest) -> Result<(), AmsError>;
    fn resume(&self, app_id: i32) -> Result<(), AmsError>;
    fn pause(&self, app_id: i32) -> Result<(), AmsError>;
    fn destroy(&self, app_id: i32) -> Result<(), AmsError>;
    fn set_foreground(&self, app_id: i32) -> Result<(), AmsError>;
    fn set_foreground_by_name(&self, suite_id: &str, class_name: &str) -> Result<(), AmsError>;
    fn midlet_info(&self, app_id: i32) -> Result<MidletInfo, AmsError>;
}

/// Routes native AMS request events to an [`IsolateLauncher`].
pub struct NativeAmsEventListener {
    launcher: Arc<dyn IsolateLauncher>,
}

impl NativeAmsEventListener {
    pub fn new(launcher: Arc<dyn IsolateLauncher>) -> Arc<Self> {
        Arc::new(NativeAmsEventListener { launcher })
    }

    /// Register this listener for every native AMS request code on `queue`.
    pub fn attach(self: &Arc<Self>, queue: &EventQueue) -> Result<(), EventError> {
        for code in AMS_REQUEST_CODES {
            queue.register(code, Arc::clone(self) as _)?;
        }
        Ok(())
    }

    fn handle(&self, event: &NativeEvent) -> Result<(), AmsError> {
        let kind = event.kind();
        match kind {
            EventType::NATIVE_MIDLET_EXECUTE_REQUEST => {
                let Some(request) = ExecuteRequest::decode(event) else {
                    tracing::warn!("execute request without class name, ignoring");
                    return Ok(());
                };
                tracing::info!(
                    app_id = request.app_id,
                    suite_id = request.suite_id,
                    class = %request.class_name,
                    "native execute request"
                );
                self.launcher.execute(&request)
            }
            EventType::NATIVE_MIDLET_RESUME_REQUEST => self.launcher.resume(event.int_param(1)),
            EventType::NATIVE_MIDLET_PAUSE_REQUEST => self.launcher.pause(event.int_param(1)),
            EventType::NATIVE_MIDLET_DESTROY_REQUEST => self.launcher.destroy(event.int_param(1)),
            EventType::NATIVE_SET_FOREGROUND_REQUEST => {
                self.launcher.set_foreground(event.int_param(1))
            }
            EventType::SET_FOREGROUND_BY_NAME_REQUEST => {
                let (Some(suite_id), Some(class_name)) =
                    (event.string_param(1), event.string_param(2))
                else {
                    tracing::warn!("foreground-by-name request missing parameters, ignoring");
                    return Ok(());
                };
                self.launcher.set_foreground_by_name(suite_id, class_name)
            }
            EventType::NATIVE_MIDLET_GETINFO_REQUEST => {
                let info = self.launcher.midlet_info(event.int_param(1))?;
                tracing::debug!(
                    suite_id = info.suite_id,
                    class = %info.class_name,
                    running = info.running,
                    "midlet info"
                );
                Ok(())
            }
            other => {
                tracing::warn!(code = other.code(), "unexpected event code in AMS listener");
                Ok(())
            }
        }
    }
}

impl EventListener for NativeAmsEventListener {
    fn process(&self, event: &NativeEvent) {
        // Launcher failures must not propagate into the dispatch loop.
        if let Err(err) = self.handle(event) {
            tracing::error!(code = event.kind().code(), error = %err, "AMS request failed");
        }
    }
}
