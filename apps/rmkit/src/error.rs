//! CLI error handling

use std::fmt;

use rmkit_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration or other library error
    Core(rmkit_errors::Error),
    /// Thread or lock primitive error
    Platform(rmkit_errors::PlatformError),
    /// Invalid command arguments
    InvalidArguments(String),
    /// The lock let concurrent increments through
    LockCheckFailed { expected: u64, observed: u64 },
    /// Output rendering error
    Render(serde_json::Error),
}

fn write_user_facing(f: &mut fmt::Formatter<'_>, e: &dyn UserFacingError) -> fmt::Result {
    write!(f, "{}", e.user_message())?;
    if let Some(code) = e.user_code() {
        write!(f, "\n  Code: {code}")?;
    }
    if let Some(hint) = e.user_hint() {
        write!(f, "\n  Hint: {hint}")?;
    }
    if e.is_retryable() {
        write!(f, "\n  Retry: safe to retry this operation.")?;
    }
    Ok(())
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write_user_facing(f, e),
            CliError::Platform(e) => write_user_facing(f, e),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::LockCheckFailed { expected, observed } => {
                write!(f, "Lock check failed: expected {expected}, counted {observed}")
            }
            CliError::Render(e) => write!(f, "Failed to render output: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(e) => Some(e),
            CliError::Platform(e) => Some(e),
            CliError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rmkit_errors::Error> for CliError {
    fn from(e: rmkit_errors::Error) -> Self {
        CliError::Core(e)
    }
}

impl From<rmkit_errors::PlatformError> for CliError {
    fn from(e: rmkit_errors::PlatformError) -> Self {
        CliError::Platform(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Render(e)
    }
}
