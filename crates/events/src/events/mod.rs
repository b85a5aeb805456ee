use serde::{Deserialize, Serialize};

use crate::EventSource;
use rmkit_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod accounting;
pub mod platform;

pub use accounting::*;
pub use platform::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Lock, thread attribute and time formatting events
    Platform(PlatformEvent),

    /// Accounting pass-through events
    Accounting(AccountingEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::Platform(_) => EventSource::Platform,
            Self::Accounting(_) => EventSource::Accounting,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Platform(PlatformEvent::PrimitiveFailed { .. } | PlatformEvent::Fatal { .. })
            | Self::Accounting(AccountingEvent::Failed { .. }) => Level::ERROR,

            Self::Platform(PlatformEvent::TimeFormatFallback { .. }) => Level::WARN,

            Self::Platform(PlatformEvent::ThreadSpawned { .. })
            | Self::Accounting(
                AccountingEvent::Delegated { .. } | AccountingEvent::Completed { .. },
            ) => Level::DEBUG,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::Platform(_) => "rmkit::events::platform",
            Self::Accounting(_) => "rmkit::events::accounting",
        }
    }

    /// One-line rendering used as the log message
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Platform(event) => match event {
                PlatformEvent::PrimitiveFailed {
                    operation,
                    site,
                    message,
                    note,
                    ..
                } => match note {
                    Some(note) => format!("{site}: {operation}(): {message} ({note})"),
                    None => format!("{site}: {operation}(): {message}"),
                },
                PlatformEvent::Fatal {
                    operation,
                    site,
                    message,
                } => format!("{site}: {operation}: {message}"),
                PlatformEvent::TimeFormatFallback { format, max } => {
                    format!("time format {format:?} does not fit {max} bytes, wrote fallback")
                }
                PlatformEvent::ThreadSpawned { name, stack_size } => {
                    format!("spawned thread {name} with {stack_size} byte stack")
                }
            },
            Self::Accounting(event) => match event {
                AccountingEvent::Delegated {
                    operation,
                    category,
                    uid,
                } => format!("{operation}: {category} request for uid {uid} delegated"),
                AccountingEvent::Completed {
                    operation,
                    returned,
                    ..
                } => match returned {
                    Some(count) => format!("{operation}: {count} entries returned"),
                    None => format!("{operation}: completed"),
                },
                AccountingEvent::Failed {
                    operation, failure, ..
                } => format!("{operation}: {}", failure.message),
            },
        }
    }
}
