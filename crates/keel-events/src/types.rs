//! Event Type Codes
//!
//! The process-wide namespace of event type codes shared between native code
//! and managed listeners. Codes are 1-based; `0` is reserved and never
//! dispatched. Native and managed sides must agree on these values — a
//! mismatch is a silent routing bug, not a detected error.

/// An event type code.
///
/// Wraps the raw integer crossing the native boundary. The dispatch table is
/// indexed by `code - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(u32);

impl EventType {
    /// Reserved invalid code; what a cleared event carries.
    pub const NONE: EventType = EventType(0);

    /// Key press/release/repeat.
    pub const KEY_EVENT: EventType = EventType(1);
    /// Pointer press/drag/release.
    pub const PEN_EVENT: EventType = EventType(2);
    /// Abstract command activation.
    pub const COMMAND_EVENT: EventType = EventType(3);
    /// Display repaint request.
    pub const REPAINT_EVENT: EventType = EventType(4);
    /// Screen change.
    pub const SCREEN_CHANGE_EVENT: EventType = EventType(5);
    /// Layout invalidation.
    pub const INVALIDATE_EVENT: EventType = EventType(6);
    /// Item state change.
    pub const ITEM_EVENT: EventType = EventType(7);
    /// Item native peer state change.
    pub const PEER_CHANGED_EVENT: EventType = EventType(8);
    /// Serialized display callback.
    pub const CALL_SERIALLY_EVENT: EventType = EventType(9);
    /// Display moved to the foreground.
    pub const FOREGROUND_NOTIFY_EVENT: EventType = EventType(10);
    /// Display moved to the background.
    pub const BACKGROUND_NOTIFY_EVENT: EventType = EventType(11);
    /// Activate an application.
    pub const ACTIVATE_MIDLET_EVENT: EventType = EventType(12);
    /// Pause an application.
    pub const PAUSE_MIDLET_EVENT: EventType = EventType(13);
    /// Destroy an application.
    pub const DESTROY_MIDLET_EVENT: EventType = EventType(14);
    /// Runtime shutdown request.
    pub const SHUTDOWN_EVENT: EventType = EventType(15);

    /// Launch an application.
    ///
    /// Slots: int1 = external app id, int2 = suite id, string1 = class name,
    /// string2 = display name, string3..string5 = arguments.
    pub const EXECUTE_MIDLET_EVENT: EventType = EventType(28);
    /// Request that an application be destroyed.
    pub const MIDLET_DESTROY_REQUEST_EVENT: EventType = EventType(29);

    /// Stops the dispatch loop when processed. Needs no registered listener.
    pub const EVENT_QUEUE_SHUTDOWN: EventType = EventType(31);

    /// Mounted filesystem roots changed (JSR-75 FileConnection).
    pub const FC_DISKS_CHANGED_EVENT: EventType = EventType(33);
    /// Reserved for testing.
    pub const TEST_EVENT: EventType = EventType(34);
    /// A paused application asks to be resumed.
    pub const MIDLET_RESUME_REQUEST: EventType = EventType(35);

    /// Native request: create and start an application.
    pub const NATIVE_MIDLET_EXECUTE_REQUEST: EventType = EventType(36);
    /// Native request: resume a paused application.
    pub const NATIVE_MIDLET_RESUME_REQUEST: EventType = EventType(37);
    /// Native request: pause an application.
    pub const NATIVE_MIDLET_PAUSE_REQUEST: EventType = EventType(38);
    /// Native request: destroy an application.
    pub const NATIVE_MIDLET_DESTROY_REQUEST: EventType = EventType(39);
    /// Native request: report application info.
    pub const NATIVE_MIDLET_GETINFO_REQUEST: EventType = EventType(40);
    /// Native request: bring an application to the foreground.
    pub const NATIVE_SET_FOREGROUND_REQUEST: EventType = EventType(41);
    /// Foreground request by suite id and class name.
    ///
    /// Slots: string1 = suite id, string2 = class name.
    pub const SET_FOREGROUND_BY_NAME_REQUEST: EventType = EventType(42);
    /// Screen rotation.
    pub const ROTATION_EVENT: EventType = EventType(43);

    /// Touch gesture recognized by the native layer.
    ///
    /// Slots: int1 = gesture kind mask, int2/int3 = drag distance x/y,
    /// int4 = display id, int5/int6 = start x/y, float = flick direction,
    /// int7/int8/int9 = flick speed / speed x / speed y.
    pub const GESTURE_EVENT: EventType = EventType(71);

    /// Wrap a raw code. `0` stays representable so cleared events can carry
    /// it, but it is rejected at registration and post time.
    pub const fn new(code: u32) -> Self {
        EventType(code)
    }

    /// The raw integer crossing the native boundary.
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Whether this is a usable (non-reserved) code.
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Dispatch-table slot for this code. Only meaningful for valid codes.
    pub(crate) const fn index(self) -> usize {
        self.0.saturating_sub(1) as usize
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::NONE
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
