//! Platform-specific operation events

use rmkit_types::CallSite;
use serde::{Deserialize, Serialize};

/// Which kind of synchronization object an operation targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPrimitive {
    Mutex,
    ThreadAttr,
}

/// Platform events for thread, lock and time-formatting primitives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// A primitive reported failure; execution continued
    PrimitiveFailed {
        primitive: SyncPrimitive,
        /// Primitive call that failed (e.g., `pthread_mutex_lock`)
        operation: String,
        /// Code that issued the operation
        site: CallSite,
        /// OS error code, when the primitive produced one
        errno: Option<i32>,
        /// Rendered OS error
        message: String,
        /// What the failure leaves behind (e.g., a possible leak)
        note: Option<String>,
    },

    /// A failure that ends the process
    Fatal {
        operation: String,
        site: CallSite,
        message: String,
    },

    /// Time formatting failed and the `#` fallback was written instead
    TimeFormatFallback {
        format: String,
        /// Requested buffer size
        max: usize,
    },

    /// A thread was created from an attribute set
    ThreadSpawned {
        name: String,
        stack_size: usize,
    },
}
