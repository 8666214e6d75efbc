//! Gesture Registration
//!
//! Zone registration and delivery for native gesture events. The native
//! recognizer posts `GESTURE_EVENT` records; this manager decodes the fixed
//! slot layout, finds every registered interactive zone that covers the
//! gesture's start point and is interested in its kind, and invokes the
//! zone's listener.
//!
//! Drag coalescing happens in `preprocess`, on the producer's thread: a drag
//! whose predecessor for the same display is still undelivered merges its
//! deltas into that pending event instead of queuing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use keel_events::{EventError, EventListener, EventQueue, EventType, NativeEvent};

/// Recognized gesture kinds. Values match the native recognizer's bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum GestureKind {
    Tap = 0x1,
    LongPress = 0x2,
    Drag = 0x4,
    Drop = 0x8,
    Flick = 0x10,
    LongPressRepeated = 0x20,
    Pinch = 0x40,
    DoubleTap = 0x80,
    RecognitionStart = 0x4000,
    RecognitionEnd = 0x8000,
}

impl GestureKind {
    /// Decode a native gesture id.
    pub fn from_mask(mask: i32) -> Option<Self> {
        match mask {
            0x1 => Some(Self::Tap),
            0x2 => Some(Self::LongPress),
            0x4 => Some(Self::Drag),
            0x8 => Some(Self::Drop),
            0x10 => Some(Self::Flick),
            0x20 => Some(Self::LongPressRepeated),
            0x40 => Some(Self::Pinch),
            0x80 => Some(Self::DoubleTap),
            0x4000 => Some(Self::RecognitionStart),
            0x8000 => Some(Self::RecognitionEnd),
            _ => None,
        }
    }

    /// The bit this kind occupies in an interest mask.
    pub fn mask(self) -> i32 {
        self as i32
    }
}

/// A rectangular interactive zone in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Zone {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Zone { x, y, width, height }
    }

    /// Whether the point lies inside this zone.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// A decoded gesture event.
///
/// Slot layout follows the native sender: int1 = kind mask, int2/int3 = drag
/// distance, int4 = display id, int5/int6 = start point, float = flick
/// direction, int7/int8/int9 = flick speed / speed x / speed y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub display_id: i32,
    pub start_x: i32,
    pub start_y: i32,
    pub drag_dx: i32,
    pub drag_dy: i32,
    pub flick_direction: f32,
    pub flick_speed: i32,
    pub flick_speed_x: i32,
    pub flick_speed_y: i32,
}

impl GestureEvent {
    /// Decode the native slot layout; `None` for an unknown kind mask.
    pub fn decode(event: &NativeEvent) -> Option<Self> {
        Some(GestureEvent {
            kind: GestureKind::from_mask(event.int_param(1))?,
            drag_dx: event.int_param(2),
            drag_dy: event.int_param(3),
            display_id: event.int_param(4),
            start_x: event.int_param(5),
            start_y: event.int_param(6),
            flick_direction: event.float_param(),
            flick_speed: event.int_param(7),
            flick_speed_x: event.int_param(8),
            flick_speed_y: event.int_param(9),
        })
    }
}

/// Callback invoked on the dispatch thread for gestures hitting a zone.
pub trait GestureListener: Send + Sync {
    fn gesture_action(&self, zone_id: u32, event: &GestureEvent);
}

struct Registration {
    id: u32,
    zone: Zone,
    /// Bitwise or of [`GestureKind::mask`] values this zone wants.
    interest: i32,
    listener: Arc<dyn GestureListener>,
}

#[derive(Default)]
struct GestureState {
    /// Registrations per display id.
    zones: HashMap<i32, Vec<Registration>>,
    next_id: u32,
}

/// Registration table for gesture interactive zones; one per event queue.
#[derive(Default)]
pub struct GestureRegistrationManager {
    state: Mutex<GestureState>,
}

impl GestureRegistrationManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register this manager for `GESTURE_EVENT` on `queue`.
    pub fn attach(self: &Arc<Self>, queue: &EventQueue) -> Result<(), EventError> {
        queue.register(EventType::GESTURE_EVENT, Arc::clone(self) as _)
    }

    /// Add an interactive zone; returns its id for later removal.
    pub fn register_zone(
        &self,
        display_id: i32,
        zone: Zone,
        interest: i32,
        listener: Arc<dyn GestureListener>,
    ) -> u32 {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.zones.entry(display_id).or_default().push(Registration {
            id,
            zone,
            interest,
            listener,
        });
        tracing::debug!(display_id, zone_id = id, "gesture zone registered");
        id
    }

    /// Remove a zone by id; returns whether it was present.
    pub fn unregister_zone(&self, display_id: i32, zone_id: u32) -> bool {
        let mut state = self.lock();
        let Some(regs) = state.zones.get_mut(&display_id) else {
            return false;
        };
        let before = regs.len();
        regs.retain(|reg| reg.id != zone_id);
        before != regs.len()
    }

    /// Number of zones registered for a display.
    pub fn zone_count(&self, display_id: i32) -> usize {
        self.lock().zones.get(&display_id).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GestureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventListener for GestureRegistrationManager {
    fn preprocess(&self, event: &mut NativeEvent, waiting: Option<&mut NativeEvent>) -> bool {
        // Only drags coalesce; every other gesture is delivered as posted.
        if event.int_param(1) != GestureKind::Drag.mask() {
            return true;
        }
        let Some(pending) = waiting else {
            return true;
        };
        if pending.int_param(1) != GestureKind::Drag.mask()
            || pending.int_param(4) != event.int_param(4)
        {
            return true;
        }
        // Fold the new deltas into the undelivered drag and drop this one.
        pending.set_int_param(2, pending.int_param(2) + event.int_param(2));
        pending.set_int_param(3, pending.int_param(3) + event.int_param(3));
        false
    }

    fn process(&self, event: &NativeEvent) {
        let Some(gesture) = GestureEvent::decode(event) else {
            tracing::warn!(mask = event.int_param(1), "unknown gesture mask, ignoring");
            return;
        };
        // Snapshot matching listeners so delivery runs without the lock held.
        let targets: Vec<(u32, Arc<dyn GestureListener>)> = {
            let state = self.lock();
            state
                .zones
                .get(&gesture.display_id)
                .map(|regs| {
                    regs.iter()
                        .filter(|reg| {
                            reg.interest & gesture.kind.mask() != 0
                                && reg.zone.contains(gesture.start_x, gesture.start_y)
                        })
                        .map(|reg| (reg.id, Arc::clone(&reg.listener)))
                        .collect()
                })
                .unwrap_or_default()
        };
        for (zone_id, listener) in targets {
            listener.gesture_action(zone_id, &gesture);
        }
    }
}
