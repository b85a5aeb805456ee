//! POSIX mutex backed by `pthread_mutex_t`

use std::cell::UnsafeCell;

use rmkit_errors::PlatformError;

use super::{ExclusivePrimitive, MutexPrimitive};

/// A default-attribute `pthread_mutex_t`.
///
/// The mutex lives in its own heap allocation so its address stays fixed
/// when the owning value moves.
pub struct PthreadMutex {
    inner: Box<UnsafeCell<libc::pthread_mutex_t>>,
}

// SAFETY: pthread mutexes are designed to be shared between threads; every
// access goes through the pthread API.
#[allow(unsafe_code)]
unsafe impl Send for PthreadMutex {}
#[allow(unsafe_code)]
unsafe impl Sync for PthreadMutex {}

// SAFETY: a successful `pthread_mutex_lock` grants exclusive ownership.
#[allow(unsafe_code)]
unsafe impl ExclusivePrimitive for PthreadMutex {}

impl Default for PthreadMutex {
    fn default() -> Self {
        Self {
            inner: Box::new(UnsafeCell::new(libc::PTHREAD_MUTEX_INITIALIZER)),
        }
    }
}

fn check(operation: &str, rc: libc::c_int) -> Result<(), PlatformError> {
    if rc == 0 {
        Ok(())
    } else {
        Err(PlatformError::from_errno(operation, rc))
    }
}

#[allow(unsafe_code)]
impl MutexPrimitive for PthreadMutex {
    fn init(&self) -> Result<(), PlatformError> {
        // SAFETY: the pointer is valid for the lifetime of `self`.
        let rc = unsafe { libc::pthread_mutex_init(self.inner.get(), std::ptr::null()) };
        check("pthread_mutex_init", rc)
    }

    fn destroy(&self) -> Result<(), PlatformError> {
        // SAFETY: as above; callers stop using the mutex after destroy.
        let rc = unsafe { libc::pthread_mutex_destroy(self.inner.get()) };
        check("pthread_mutex_destroy", rc)
    }

    fn lock(&self) -> Result<(), PlatformError> {
        // SAFETY: as above.
        let rc = unsafe { libc::pthread_mutex_lock(self.inner.get()) };
        check("pthread_mutex_lock", rc)
    }

    fn unlock(&self) -> Result<(), PlatformError> {
        // SAFETY: as above.
        let rc = unsafe { libc::pthread_mutex_unlock(self.inner.get()) };
        check("pthread_mutex_unlock", rc)
    }
}
