//! Error-checked mutual exclusion
//!
//! A [`MutexPrimitive`] is the raw capability: four calls that return the OS
//! error code as a [`PlatformError`]. [`CheckedMutex`] wraps one and turns
//! every failure into a diagnostic naming the file, line and function that
//! issued the call, then lets the caller carry on.
//!
//! Which primitive backs [`DefaultMutex`] is decided at build time by the
//! `threads` feature. Without it the default is [`NoopMutex`] and locking
//! provides no exclusion at all.

mod noop;
#[cfg(all(unix, feature = "threads"))]
mod pthread;

pub use noop::NoopMutex;
#[cfg(all(unix, feature = "threads"))]
pub use pthread::PthreadMutex;

use std::cell::UnsafeCell;

use rmkit_errors::PlatformError;
use rmkit_events::SyncPrimitive;
use rmkit_types::CallSite;

use crate::report::report_failure;

/// Primitive selected by the `threads` feature.
#[cfg(all(unix, feature = "threads"))]
pub type DefaultMutex = PthreadMutex;

/// Primitive selected by the `threads` feature.
#[cfg(not(all(unix, feature = "threads")))]
pub type DefaultMutex = NoopMutex;

/// Raw mutual-exclusion capability.
///
/// Implementations use interior mutability: all calls take `&self` so the
/// primitive can be shared between the threads it serializes.
pub trait MutexPrimitive: Send + Sync {
    /// Initialize with default attributes.
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the primitive.
    fn init(&self) -> Result<(), PlatformError>;

    /// Release OS resources held by the primitive.
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the primitive.
    fn destroy(&self) -> Result<(), PlatformError>;

    /// Block until the calling thread owns the primitive.
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the primitive.
    fn lock(&self) -> Result<(), PlatformError>;

    /// Release ownership taken by [`MutexPrimitive::lock`].
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the primitive.
    fn unlock(&self) -> Result<(), PlatformError>;
}

/// Marker for primitives whose `lock` really excludes other threads.
///
/// # Safety
///
/// After `lock` returns `Ok`, no other thread may return `Ok` from `lock` on
/// the same primitive until the owner calls `unlock`.
#[allow(unsafe_code)]
pub unsafe trait ExclusivePrimitive: MutexPrimitive {}

/// A mutual-exclusion object whose failures are always logged.
///
/// Created once by [`CheckedMutex::init`], destroyed once by
/// [`CheckedMutex::destroy`] (or on drop). Destroying takes ownership, so a
/// lock shared through an `Arc` can only be destroyed after every other
/// holder has let go.
pub struct CheckedMutex<P: MutexPrimitive = DefaultMutex> {
    raw: P,
    destroyed: bool,
}

impl<P: MutexPrimitive + Default> CheckedMutex<P> {
    /// Initialize a new lock, logging a failure against `site`.
    ///
    /// Use `<CheckedMutex>::init(..)` or [`mutex_init!`](crate::mutex_init)
    /// to get the build's default primitive.
    #[must_use]
    pub fn init(site: CallSite) -> Self {
        Self::init_with(P::default(), site)
    }
}

impl<P: MutexPrimitive> CheckedMutex<P> {
    /// Initialize `raw`, logging a failure against `site`.
    ///
    /// A failed init leaves the primitive in an undefined state; later calls
    /// on it will most likely fail and be logged as well.
    #[must_use]
    pub fn init_with(raw: P, site: CallSite) -> Self {
        if let Err(err) = raw.init() {
            report_failure(SyncPrimitive::Mutex, "pthread_mutex_init", site, &err, None);
        }
        Self {
            raw,
            destroyed: false,
        }
    }

    /// Acquire the lock. A failure is logged and control returns anyway.
    pub fn lock(&self, site: CallSite) {
        let _ = self.acquire(site);
    }

    /// Acquire the lock, logging a failure and also returning it.
    ///
    /// # Errors
    ///
    /// Returns the primitive's error when the lock was not obtained.
    pub fn acquire(&self, site: CallSite) -> Result<(), PlatformError> {
        self.raw.lock().inspect_err(|err| {
            report_failure(SyncPrimitive::Mutex, "pthread_mutex_lock", site, err, None);
        })
    }

    /// Release the lock. A failure is logged and control returns anyway.
    pub fn unlock(&self, site: CallSite) {
        if let Err(err) = self.raw.unlock() {
            report_failure(SyncPrimitive::Mutex, "pthread_mutex_unlock", site, &err, None);
        }
    }

    /// Lock and return a guard that unlocks when dropped.
    ///
    /// Like [`lock`](Self::lock) this continues after a failed acquisition,
    /// so the guard still unlocks on drop and that unlock is logged as well.
    /// Use [`try_guard`](Self::try_guard) when the section must not run
    /// without the lock.
    pub fn guard(&self, site: CallSite) -> CheckedGuard<'_, P> {
        self.lock(site.clone());
        CheckedGuard { mutex: self, site }
    }

    /// Lock and return a guard only if the lock was obtained.
    ///
    /// # Errors
    ///
    /// Returns the primitive's error when the lock was not obtained; nothing
    /// is unlocked in that case.
    pub fn try_guard(&self, site: CallSite) -> Result<CheckedGuard<'_, P>, PlatformError> {
        self.acquire(site.clone())?;
        Ok(CheckedGuard { mutex: self, site })
    }

    /// Destroy the lock. A failure is logged; the OS resources may leak.
    pub fn destroy(mut self, site: CallSite) {
        self.destroy_raw(site);
    }

    /// The wrapped primitive.
    pub fn primitive(&self) -> &P {
        &self.raw
    }

    fn destroy_raw(&mut self, site: CallSite) {
        self.destroyed = true;
        if let Err(err) = self.raw.destroy() {
            report_failure(
                SyncPrimitive::Mutex,
                "pthread_mutex_destroy",
                site,
                &err,
                Some("lock resources may leak"),
            );
        }
    }
}

impl<P: MutexPrimitive> Drop for CheckedMutex<P> {
    fn drop(&mut self) {
        if !self.destroyed {
            self.destroy_raw(CallSite::new(file!(), line!(), "CheckedMutex::drop"));
        }
    }
}

impl<P: MutexPrimitive> std::fmt::Debug for CheckedMutex<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckedMutex")
            .field("primitive", &std::any::type_name::<P>())
            .finish_non_exhaustive()
    }
}

/// Unlocks its [`CheckedMutex`] on drop, attributing failures to the site
/// that took the lock.
#[must_use = "dropping the guard unlocks immediately"]
pub struct CheckedGuard<'a, P: MutexPrimitive> {
    mutex: &'a CheckedMutex<P>,
    site: CallSite,
}

impl<P: MutexPrimitive> Drop for CheckedGuard<'_, P> {
    fn drop(&mut self) {
        self.mutex.unlock(self.site.clone());
    }
}

/// A value that is only reachable while its lock is held.
///
/// Unlike the bare lock calls, [`Guarded::with`] does not continue after a
/// failed acquisition: it hands out `&mut T`, which is only sound under
/// exclusion. The failure is logged and returned instead.
pub struct Guarded<T, P: MutexPrimitive = DefaultMutex> {
    mutex: CheckedMutex<P>,
    value: UnsafeCell<T>,
}

// SAFETY: `value` is only reached through `with`, which holds the lock of an
// exclusive primitive for the duration of the borrow.
#[allow(unsafe_code)]
unsafe impl<T: Send, P: ExclusivePrimitive> Sync for Guarded<T, P> {}

impl<T, P: MutexPrimitive + Default> Guarded<T, P> {
    #[must_use]
    pub fn new(value: T, site: CallSite) -> Self {
        Self::with_primitive(value, P::default(), site)
    }
}

impl<T, P: MutexPrimitive> Guarded<T, P> {
    #[must_use]
    pub fn with_primitive(value: T, raw: P, site: CallSite) -> Self {
        Self {
            mutex: CheckedMutex::init_with(raw, site),
            value: UnsafeCell::new(value),
        }
    }

    /// Run `f` on the value with the lock held.
    ///
    /// # Errors
    ///
    /// Returns the primitive's error when the lock could not be taken; `f` is
    /// not called in that case.
    pub fn with<R>(
        &self,
        site: CallSite,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, PlatformError> {
        let _guard = self.mutex.try_guard(site)?;
        // SAFETY: the lock is held until `_guard` drops, after `f` returns.
        #[allow(unsafe_code)]
        let value = unsafe { &mut *self.value.get() };
        Ok(f(value))
    }

    /// Mutable access without locking; `&mut self` already proves exclusivity.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Destroy the lock and return the value.
    pub fn into_inner(self, site: CallSite) -> T {
        let Self { mutex, value } = self;
        mutex.destroy(site);
        value.into_inner()
    }
}

/// Initialize a [`CheckedMutex`] attributed to the current call site.
///
/// `mutex_init!()` uses the build's default primitive;
/// `mutex_init!(raw)` wraps an explicit one.
#[macro_export]
macro_rules! mutex_init {
    () => {
        <$crate::sync::CheckedMutex>::init($crate::call_site!())
    };
    ($raw:expr) => {
        $crate::sync::CheckedMutex::init_with($raw, $crate::call_site!())
    };
}

/// Lock a [`CheckedMutex`], logging failures against the current call site.
#[macro_export]
macro_rules! mutex_lock {
    ($mutex:expr) => {
        $mutex.lock($crate::call_site!())
    };
}

/// Unlock a [`CheckedMutex`], logging failures against the current call site.
#[macro_export]
macro_rules! mutex_unlock {
    ($mutex:expr) => {
        $mutex.unlock($crate::call_site!())
    };
}

/// Destroy a [`CheckedMutex`], logging failures against the current call site.
#[macro_export]
macro_rules! mutex_destroy {
    ($mutex:expr) => {
        $mutex.destroy($crate::call_site!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_diagnostics, FlakyMutex};
    use rmkit_events::{AppEvent, PlatformEvent};

    fn failures(events: &[AppEvent]) -> Vec<(String, String)> {
        events
            .iter()
            .filter_map(|event| match event {
                AppEvent::Platform(PlatformEvent::PrimitiveFailed {
                    operation, site, ..
                }) => Some((operation.clone(), site.function.to_string())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_failed_lock_is_logged_and_returns() {
        let events = capture_diagnostics(|| {
            let mutex = crate::mutex_init!(FlakyMutex::failing_lock(libc::EDEADLK));
            crate::mutex_lock!(mutex);
            crate::mutex_unlock!(mutex);
            crate::mutex_destroy!(mutex);
        });

        let failures = failures(&events);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "pthread_mutex_lock");
        assert!(failures[0]
            .1
            .ends_with("test_failed_lock_is_logged_and_returns"));
    }

    #[test]
    fn test_every_operation_reports_its_own_failure() {
        let events = capture_diagnostics(|| {
            let mutex = crate::mutex_init!(FlakyMutex::failing_all(libc::EINVAL));
            mutex.lock(rmkit_types::call_site!());
            mutex.unlock(rmkit_types::call_site!());
            mutex.destroy(rmkit_types::call_site!());
        });

        let operations: Vec<String> = failures(&events).into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            operations,
            vec![
                "pthread_mutex_init",
                "pthread_mutex_lock",
                "pthread_mutex_unlock",
                "pthread_mutex_destroy",
            ]
        );
    }

    #[test]
    fn test_try_guard_does_not_unlock_after_failed_lock() {
        let events = capture_diagnostics(|| {
            let mutex = crate::mutex_init!(FlakyMutex::failing_all(libc::EINVAL));
            {
                let _guard = mutex.guard(rmkit_types::call_site!());
            }
            let err = mutex.try_guard(rmkit_types::call_site!()).err().unwrap();
            assert_eq!(err.errno(), Some(libc::EINVAL));
            crate::mutex_destroy!(mutex);
        });

        let operations: Vec<String> = failures(&events).into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            operations,
            vec![
                "pthread_mutex_init",
                "pthread_mutex_lock",
                "pthread_mutex_unlock",
                "pthread_mutex_lock",
                "pthread_mutex_destroy",
            ]
        );
    }

    #[test]
    fn test_try_guard_unlocks_on_drop() {
        let mutex = crate::mutex_init!(FlakyMutex::healthy());
        {
            let _guard = mutex.try_guard(rmkit_types::call_site!()).unwrap();
        }
        assert!(mutex.try_guard(rmkit_types::call_site!()).is_ok());
        crate::mutex_destroy!(mutex);
    }

    #[test]
    fn test_drop_destroys_once() {
        let raw = FlakyMutex::healthy();
        let destroyed = raw.destroy_count();
        {
            let _mutex = CheckedMutex::init_with(raw, rmkit_types::call_site!());
        }
        assert_eq!(destroyed.load(std::sync::atomic::Ordering::SeqCst), 1);

        let raw = FlakyMutex::healthy();
        let destroyed = raw.destroy_count();
        CheckedMutex::init_with(raw, rmkit_types::call_site!()).destroy(rmkit_types::call_site!());
        assert_eq!(destroyed.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guarded_refuses_access_without_lock() {
        let events = capture_diagnostics(|| {
            let guarded = Guarded::with_primitive(
                5_u32,
                FlakyMutex::failing_lock(libc::EAGAIN),
                rmkit_types::call_site!(),
            );
            let mut called = false;
            let result = guarded.with(rmkit_types::call_site!(), |_| called = true);
            assert_eq!(result.unwrap_err().errno(), Some(libc::EAGAIN));
            assert!(!called);
        });
        assert_eq!(failures(&events).len(), 1);
    }

    #[test]
    fn test_noop_mutex_never_fails() {
        let events = capture_diagnostics(|| {
            let mutex = crate::mutex_init!(NoopMutex);
            {
                let _guard = mutex.guard(rmkit_types::call_site!());
            }
            crate::mutex_destroy!(mutex);
        });
        assert!(failures(&events).is_empty());
    }
}
