//! Dispatch-thread integration tests: producer threads post, the dedicated
//! consumer drains in FIFO order.

use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::time::Duration;

use keel_events::{EventListener, EventQueue, EventType, NativeEvent, PostStatus};

const WAIT: Duration = Duration::from_secs(5);

/// Forwards every processed event's (code, int1) over a channel.
struct Forwarder {
    tx: Sender<(u32, i32)>,
}

impl Forwarder {
    fn new(tx: Sender<(u32, i32)>) -> Arc<Self> {
        Arc::new(Forwarder { tx })
    }
}

impl EventListener for Forwarder {
    fn process(&self, event: &NativeEvent) {
        let _ = self.tx.send((event.kind().code(), event.int_param(1)));
    }
}

#[test]
fn test_single_event_roundtrip() {
    let queue = EventQueue::new();
    let (tx, rx) = channel();
    queue.register(EventType::new(14), Forwarder::new(tx)).unwrap();
    queue.start().unwrap();

    let mut event = queue.pool().get();
    event.set_kind(EventType::new(14));
    event.set_int_param(1, 77);
    assert_eq!(queue.post(event), PostStatus::Queued);

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (14, 77));
    queue.shutdown().unwrap();
    assert_eq!(queue.pending(), 0);
    assert_eq!(queue.waiting_seq(EventType::new(14)), None);
}

#[test]
fn test_process_order_is_fifo_across_codes() {
    let queue = EventQueue::new();
    let (tx, rx) = channel();
    let forwarder = Forwarder::new(tx);
    queue.register(EventType::new(5), forwarder.clone()).unwrap();
    queue.register(EventType::new(7), forwarder).unwrap();

    // Post before starting: the FIFO holds events until a consumer runs.
    for (i, code) in [5u32, 7, 5].into_iter().enumerate() {
        let mut event = queue.pool().get();
        event.set_kind(EventType::new(code));
        event.set_int_param(1, i as i32);
        queue.post(event);
    }
    assert_eq!(queue.pending(), 3);
    queue.start().unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(rx.recv_timeout(WAIT).unwrap());
    }
    assert_eq!(seen, vec![(5, 0), (7, 1), (5, 2)]);
    queue.shutdown().unwrap();
}

#[test]
fn test_posts_from_many_threads_all_delivered() {
    let queue = Arc::new(EventQueue::new());
    let (tx, rx) = channel();
    queue.register(EventType::new(2), Forwarder::new(tx)).unwrap();
    queue.start().unwrap();

    let mut producers = Vec::new();
    for t in 0..4 {
        let queue = Arc::clone(&queue);
        producers.push(std::thread::spawn(move || {
            for i in 0..25 {
                let mut event = queue.pool().get();
                event.set_kind(EventType::new(2));
                event.set_int_param(1, t * 100 + i);
                assert_eq!(queue.post(event), PostStatus::Queued);
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..100 {
        seen.push(rx.recv_timeout(WAIT).unwrap().1);
    }
    seen.sort_unstable();
    let expected: Vec<i32> = (0..4).flat_map(|t| (0..25).map(move |i| t * 100 + i)).collect();
    assert_eq!(seen, expected);
    queue.shutdown().unwrap();
}

#[test]
fn test_panicking_process_does_not_wedge_the_loop() {
    struct PanicOn {
        bad: i32,
        tx: Sender<(u32, i32)>,
    }
    impl EventListener for PanicOn {
        fn process(&self, event: &NativeEvent) {
            if event.int_param(1) == self.bad {
                panic!("poison event");
            }
            let _ = self.tx.send((event.kind().code(), event.int_param(1)));
        }
    }

    let queue = EventQueue::new();
    let (tx, rx) = channel();
    queue
        .register(EventType::new(4), Arc::new(PanicOn { bad: 1, tx }))
        .unwrap();
    queue.start().unwrap();

    for i in 0..3 {
        let mut event = queue.pool().get();
        event.set_kind(EventType::new(4));
        event.set_int_param(1, i);
        queue.post(event);
    }

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (4, 0));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (4, 2));
    queue.shutdown().unwrap();
}

#[test]
fn test_shutdown_event_stops_dispatch_after_draining() {
    let queue = EventQueue::new();
    let (tx, rx) = channel();
    queue.register(EventType::new(9), Forwarder::new(tx)).unwrap();
    queue.start().unwrap();

    let mut event = queue.pool().get();
    event.set_kind(EventType::new(9));
    event.set_int_param(1, 1);
    queue.post(event);
    queue.send_shutdown_event();

    // The event posted before the shutdown marker is still delivered.
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), (9, 1));
    // The loop then stops on its own.
    let deadline = std::time::Instant::now() + WAIT;
    while queue.is_alive() {
        assert!(std::time::Instant::now() < deadline, "loop did not stop");
        std::thread::yield_now();
    }

    // Posts still succeed after shutdown but are never drained.
    let mut late = queue.pool().get();
    late.set_kind(EventType::new(9));
    late.set_int_param(1, 2);
    assert_eq!(queue.post(late), PostStatus::Queued);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    queue.shutdown().unwrap();
}

#[test]
fn test_processed_events_are_recycled() {
    let queue = EventQueue::new();
    let (tx, rx) = channel();
    queue.register(EventType::new(8), Forwarder::new(tx)).unwrap();
    queue.start().unwrap();

    let mut event = queue.pool().get();
    event.set_kind(EventType::new(8));
    queue.post(event);
    rx.recv_timeout(WAIT).unwrap();

    let deadline = std::time::Instant::now() + WAIT;
    while queue.pool().is_empty() {
        assert!(std::time::Instant::now() < deadline, "event never recycled");
        std::thread::yield_now();
    }
    queue.shutdown().unwrap();
}
