//! Accounting storage error types
//!
//! These are produced by the accounting-storage plugin and handed back to the
//! caller unchanged by the resource functions.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AccountingError {
    #[error("accounting storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("permission denied for uid {uid}: {operation}")]
    PermissionDenied { uid: u32, operation: String },

    #[error("request rejected by accounting storage: {message}")]
    Rejected { message: String },

    #[error("nothing matched the {category} condition")]
    NothingMatched { category: String },
}

impl UserFacingError for AccountingError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::StorageUnavailable { .. } => {
                Some("Check that the accounting storage daemon is running and reachable.")
            }
            Self::PermissionDenied { .. } => {
                Some("Resource changes require an operator or administrator account.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::StorageUnavailable { .. } => "accounting.storage_unavailable",
            Self::PermissionDenied { .. } => "accounting.permission_denied",
            Self::Rejected { .. } => "accounting.rejected",
            Self::NothingMatched { .. } => "accounting.nothing_matched",
        };
        Some(code)
    }
}
