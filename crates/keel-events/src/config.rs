//! Queue configuration.

use serde::{Deserialize, Serialize};

use crate::pool::DEFAULT_POOL_SIZE;

/// Tunables for an [`EventQueue`](crate::EventQueue).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Capacity of the native event pool (recycled events kept around).
    pub pool_size: usize,
    /// Initial dispatch-table length; the table still grows on demand when a
    /// larger type code is registered.
    pub initial_table_len: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            pool_size: DEFAULT_POOL_SIZE,
            initial_table_len: 16,
        }
    }
}
