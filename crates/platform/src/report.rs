//! Failure reporting shared by the lock and thread-attribute wrappers

use rmkit_errors::PlatformError;
use rmkit_events::{diagnostics, AppEvent, PlatformEvent, SyncPrimitive};
use rmkit_types::CallSite;

/// Report a failed primitive call against the site that issued it.
pub(crate) fn report_failure(
    primitive: SyncPrimitive,
    operation: &str,
    site: CallSite,
    err: &PlatformError,
    note: Option<&str>,
) {
    diagnostics::report(AppEvent::Platform(PlatformEvent::PrimitiveFailed {
        primitive,
        operation: operation.to_string(),
        site,
        errno: err.errno(),
        message: os_message(err),
        note: note.map(str::to_string),
    }));
}

/// Report a failure that ends the process.
pub(crate) fn report_fatal(operation: &str, site: CallSite, err: &PlatformError) {
    diagnostics::report(AppEvent::Platform(PlatformEvent::Fatal {
        operation: operation.to_string(),
        site,
        message: os_message(err),
    }));
}

/// The OS error text without the operation prefix the error's `Display` adds.
fn os_message(err: &PlatformError) -> String {
    match err {
        PlatformError::SyncPrimitiveFailed { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
