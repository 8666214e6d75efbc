//! Example: wiring the event bridge to the MIDP listeners.

use std::sync::Arc;

use keel_events::{EventQueue, EventType};
use keel_midp::{GestureEvent, GestureKind, GestureListener, GestureRegistrationManager, Zone};

struct PrintGesture;

impl GestureListener for PrintGesture {
    fn gesture_action(&self, zone_id: u32, event: &GestureEvent) {
        println!("zone {zone_id}: {:?} at ({}, {})", event.kind, event.start_x, event.start_y);
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let queue = EventQueue::new();
    let gestures = GestureRegistrationManager::new();
    gestures.attach(&queue).unwrap();
    gestures.register_zone(
        1,
        Zone::new(0, 0, 240, 320),
        GestureKind::Tap.mask() | GestureKind::Drag.mask(),
        Arc::new(PrintGesture),
    );
    queue.start().unwrap();

    // Stand-in for the native input layer: a tap at (120, 160).
    let mut event = queue.pool().get();
    event.set_kind(EventType::GESTURE_EVENT);
    event.set_int_param(1, GestureKind::Tap.mask());
    event.set_int_param(4, 1);
    event.set_int_param(5, 120);
    event.set_int_param(6, 160);
    queue.post(event);

    // Drain everything posted so far, then stop.
    queue.send_shutdown_event();
    while queue.is_alive() {
        std::thread::yield_now();
    }
    queue.shutdown().unwrap();
}
