//! Native Events
//!
//! The fixed-shape record that moves data across the native/managed boundary.
//! The native ABI is fixed arity: a type code plus positional integer, string
//! and float slots. Slot numbering is 1-based to match the native header.

use crate::types::EventType;

/// Number of integer parameter slots (the gesture event uses all 16).
pub const INT_PARAMS: usize = 16;

/// Number of string parameter slots.
pub const STRING_PARAMS: usize = 6;

/// A reusable event record.
///
/// Owned by exactly one of {pool, queue, in-flight listener} at any time;
/// ownership moves with the value, so an event can never be observed in two
/// structures at once.
#[derive(Debug, Clone, Default)]
pub struct NativeEvent {
    kind: EventType,
    int_params: [i32; INT_PARAMS],
    string_params: [Option<String>; STRING_PARAMS],
    float_param: f32,
    /// Queue-assigned stamp, 0 until posted. Identifies this event as the
    /// pending ("waiting") one of its type without holding a reference to it.
    seq: u64,
}

impl NativeEvent {
    /// Create a fresh event of the given type with zeroed slots.
    pub fn new(kind: EventType) -> Self {
        NativeEvent {
            kind,
            ..NativeEvent::default()
        }
    }

    /// The type code.
    pub fn kind(&self) -> EventType {
        self.kind
    }

    /// Set the type code.
    pub fn set_kind(&mut self, kind: EventType) {
        self.kind = kind;
    }

    /// Read integer slot `n` (1-based).
    ///
    /// # Panics
    /// If `n` is outside `1..=16`; the native ABI is fixed arity.
    pub fn int_param(&self, n: usize) -> i32 {
        self.int_params[Self::slot(n, INT_PARAMS)]
    }

    /// Write integer slot `n` (1-based).
    pub fn set_int_param(&mut self, n: usize, value: i32) {
        self.int_params[Self::slot(n, INT_PARAMS)] = value;
    }

    /// Read string slot `n` (1-based).
    pub fn string_param(&self, n: usize) -> Option<&str> {
        self.string_params[Self::slot(n, STRING_PARAMS)].as_deref()
    }

    /// Write string slot `n` (1-based).
    pub fn set_string_param(&mut self, n: usize, value: impl Into<String>) {
        self.string_params[Self::slot(n, STRING_PARAMS)] = Some(value.into());
    }

    /// The single float slot.
    pub fn float_param(&self) -> f32 {
        self.float_param
    }

    /// Write the float slot.
    pub fn set_float_param(&mut self, value: f32) {
        self.float_param = value;
    }

    /// Queue-assigned stamp; 0 means the event has not been posted.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub(crate) fn stamp(&mut self, seq: u64) {
        self.seq = seq;
    }

    /// Reset every slot to its zero/empty value.
    ///
    /// Runs before an event re-enters the pool; a recycled event must never
    /// leak a previous payload to its next producer.
    pub fn clear(&mut self) {
        self.kind = EventType::NONE;
        self.int_params = [0; INT_PARAMS];
        for slot in &mut self.string_params {
            *slot = None;
        }
        self.float_param = 0.0;
        self.seq = 0;
    }

    fn slot(n: usize, count: usize) -> usize {
        assert!(
            n >= 1 && n <= count,
            "parameter slot {n} out of range 1..={count}"
        );
        n - 1
    }
}
