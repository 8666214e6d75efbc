//! End-to-end bridge tests: native-style producers posting through the pool,
//! the dispatch thread delivering to the MIDP listeners.

use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use keel_events::{EventQueue, EventType, NativeEvent, PostStatus};
use keel_midp::{
    AmsError, ExecuteRequest, FileSystemEventHandler, GestureEvent, GestureKind, GestureListener,
    GestureRegistrationManager, IsolateLauncher, MidletInfo, NativeAmsEventListener, RootListener,
    RootProvider, Zone,
};

const WAIT: Duration = Duration::from_secs(5);

fn gesture(queue: &EventQueue, kind: GestureKind, display: i32, x: i32, y: i32) -> NativeEvent {
    let mut event = queue.pool().get();
    event.set_kind(EventType::GESTURE_EVENT);
    event.set_int_param(1, kind.mask());
    event.set_int_param(4, display);
    event.set_int_param(5, x);
    event.set_int_param(6, y);
    event
}

struct TapProbe {
    tx: Sender<(u32, i32, i32)>,
}

impl GestureListener for TapProbe {
    fn gesture_action(&self, zone_id: u32, event: &GestureEvent) {
        let _ = self.tx.send((zone_id, event.start_x, event.start_y));
    }
}

#[test]
fn test_native_tap_reaches_zone_listener() {
    let queue = Arc::new(EventQueue::new());
    let gestures = GestureRegistrationManager::new();
    gestures.attach(&queue).unwrap();
    let (tx, rx) = channel();
    let zone_id = gestures.register_zone(
        1,
        Zone::new(0, 0, 240, 320),
        GestureKind::Tap.mask() | GestureKind::DoubleTap.mask(),
        Arc::new(TapProbe { tx }),
    );
    queue.start().unwrap();

    // Producer thread standing in for the native input layer.
    let producer = {
        let queue = Arc::clone(&queue);
        std::thread::spawn(move || queue.post(gesture(&queue, GestureKind::Tap, 1, 120, 40)))
    };
    assert_eq!(producer.join().unwrap(), PostStatus::Queued);

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (zone_id, 120, 40));
    queue.shutdown().unwrap();
}

#[test]
fn test_drag_burst_coalesces_to_one_delivery() {
    let queue = EventQueue::new();
    let gestures = GestureRegistrationManager::new();
    gestures.attach(&queue).unwrap();
    let (tx, rx) = channel();

    struct DragProbe {
        tx: Sender<(i32, i32)>,
    }
    impl GestureListener for DragProbe {
        fn gesture_action(&self, _zone_id: u32, event: &GestureEvent) {
            let _ = self.tx.send((event.drag_dx, event.drag_dy));
        }
    }
    gestures.register_zone(
        1,
        Zone::new(0, 0, 240, 320),
        GestureKind::Drag.mask(),
        Arc::new(DragProbe { tx }),
    );

    // Post a burst before the consumer runs; only the first drag queues, the
    // rest fold their deltas into it.
    for (dx, dy) in [(4, 1), (3, -1), (5, 2)] {
        let mut event = gesture(&queue, GestureKind::Drag, 1, 10, 10);
        event.set_int_param(2, dx);
        event.set_int_param(3, dy);
        queue.post(event);
    }
    assert_eq!(queue.pending(), 1);

    queue.start().unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (12, 2));
    queue.shutdown().unwrap();
}

#[test]
fn test_native_execute_request_reaches_launcher() {
    struct LaunchProbe {
        tx: Sender<ExecuteRequest>,
    }
    impl IsolateLauncher for LaunchProbe {
        fn execute(&self, request: &ExecuteRequest) -> Result<(), AmsError> {
            let _ = self.tx.send(request.clone());
            Ok(())
        }
        fn resume(&self, _: i32) -> Result<(), AmsError> {
            Ok(())
        }
        fn pause(&self, _: i32) -> Result<(), AmsError> {
            Ok(())
        }
        fn destroy(&self, _: i32) -> Result<(), AmsError> {
            Ok(())
        }
        fn set_foreground(&self, _: i32) -> Result<(), AmsError> {
            Ok(())
        }
        fn set_foreground_by_name(&self, _: &str, _: &str) -> Result<(), AmsError> {
            Ok(())
        }
        fn midlet_info(&self, app_id: i32) -> Result<MidletInfo, AmsError> {
            Err(AmsError::UnknownApp(app_id))
        }
    }

    let queue = EventQueue::new();
    let (tx, rx) = channel();
    let ams = NativeAmsEventListener::new(Arc::new(LaunchProbe { tx }));
    ams.attach(&queue).unwrap();
    queue.start().unwrap();

    let mut event = queue.pool().get();
    event.set_kind(EventType::NATIVE_MIDLET_EXECUTE_REQUEST);
    event.set_int_param(1, 1);
    event.set_int_param(2, 10);
    event.set_string_param(1, "com.example.Clock");
    queue.post(event);

    let request = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(request.suite_id, 10);
    assert_eq!(request.class_name, "com.example.Clock");
    queue.shutdown().unwrap();
}

#[test]
fn test_disks_changed_burst_rescans_once() {
    #[derive(Default)]
    struct FakeDisks {
        roots: Mutex<Vec<String>>,
    }
    impl RootProvider for FakeDisks {
        fn mounted_roots(&self) -> Vec<String> {
            self.roots.lock().unwrap().clone()
        }
    }
    struct RootProbe {
        tx: Sender<String>,
    }
    impl RootListener for RootProbe {
        fn root_added(&self, root: &str) {
            let _ = self.tx.send(format!("+{root}"));
        }
        fn root_removed(&self, root: &str) {
            let _ = self.tx.send(format!("-{root}"));
        }
    }

    let queue = EventQueue::new();
    let disks = Arc::new(FakeDisks::default());
    let handler = FileSystemEventHandler::new(disks.clone());
    handler.attach(&queue).unwrap();
    let (tx, rx) = channel();
    handler.add_listener(Arc::new(RootProbe { tx }));

    // Card inserted; the native layer fires a burst of notifications.
    *disks.roots.lock().unwrap() = vec!["SDCard/".into()];
    for _ in 0..5 {
        let mut event = queue.pool().get();
        event.set_kind(EventType::FC_DISKS_CHANGED_EVENT);
        queue.post(event);
    }
    assert_eq!(queue.pending(), 1);

    queue.start().unwrap();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), "+SDCard/");
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    queue.shutdown().unwrap();
}
