#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Threading and time primitives for rmkit daemons.
//!
//! - [`sync`]: error-checked mutexes that log every failure with the call
//!   site that caused it and keep going
//! - [`thread`]: thread-creation attributes; failing to create them is fatal
//! - [`time`]: `strftime`-style formatting into a bounded buffer
//!
//! With the `threads` feature disabled the lock and attribute calls compile
//! to no-ops, and values guarded by a lock can no longer be shared between
//! threads.

mod report;
pub mod sync;
pub mod thread;
pub mod time;

#[cfg(test)]
mod test_support;

pub use rmkit_types::call_site;

pub use sync::{CheckedGuard, CheckedMutex, DefaultMutex, Guarded, MutexPrimitive};
pub use thread::{AttrPrimitive, DefaultAttr, ProcessExit, Terminate, ThreadAttr};
pub use time::{format_bounded, format_time};

/// Whether this build provides real mutual exclusion.
pub const THREADS_ENABLED: bool = cfg!(all(unix, feature = "threads"));
