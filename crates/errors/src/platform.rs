//! Platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur in thread and synchronization primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PlatformError {
    #[error("{operation}(): {message}")]
    SyncPrimitiveFailed {
        operation: String,
        errno: i32,
        message: String,
    },

    #[error("thread spawn failed: {name} - {message}")]
    ThreadSpawnFailed { name: String, message: String },

    #[error("platform capability not available: {capability}")]
    CapabilityUnavailable { capability: String },
}

impl PlatformError {
    /// Build a primitive failure from a raw OS error code
    #[must_use]
    pub fn from_errno(operation: impl Into<String>, errno: i32) -> Self {
        Self::SyncPrimitiveFailed {
            operation: operation.into(),
            errno,
            message: std::io::Error::from_raw_os_error(errno).to_string(),
        }
    }

    /// OS error code carried by this error, if any
    #[must_use]
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::SyncPrimitiveFailed { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ThreadSpawnFailed { .. } => {
                Some("Check the process thread and memory limits (ulimit -u / -s).")
            }
            Self::CapabilityUnavailable { .. } => {
                Some("Rebuild with the `threads` feature on a platform with pthreads.")
            }
            Self::SyncPrimitiveFailed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ThreadSpawnFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SyncPrimitiveFailed { .. } => "platform.sync_primitive_failed",
            Self::ThreadSpawnFailed { .. } => "platform.thread_spawn_failed",
            Self::CapabilityUnavailable { .. } => "platform.capability_unavailable",
        };
        Some(code)
    }
}

