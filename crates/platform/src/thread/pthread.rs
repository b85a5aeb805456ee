//! POSIX thread attributes backed by `pthread_attr_t`

use rmkit_errors::PlatformError;

use super::AttrPrimitive;

#[cfg(any(target_os = "linux", target_os = "macos"))]
mod scope {
    #[cfg(target_os = "linux")]
    pub const PTHREAD_SCOPE_SYSTEM: libc::c_int = 0;
    #[cfg(target_os = "macos")]
    pub const PTHREAD_SCOPE_SYSTEM: libc::c_int = 1;

    extern "C" {
        pub fn pthread_attr_setscope(
            attr: *mut libc::pthread_attr_t,
            scope: libc::c_int,
        ) -> libc::c_int;
    }
}

pub struct PthreadAttr {
    inner: Box<libc::pthread_attr_t>,
}

// SAFETY: the attribute object is plain data owned by this value and is only
// touched through `&mut self` or `&self` pthread getters.
#[allow(unsafe_code)]
unsafe impl Send for PthreadAttr {}

impl Default for PthreadAttr {
    fn default() -> Self {
        // SAFETY: an all-zero `pthread_attr_t` is a valid value to hand to
        // `pthread_attr_init`, which overwrites it.
        #[allow(unsafe_code)]
        let inner = Box::new(unsafe { std::mem::zeroed() });
        Self { inner }
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
impl AttrPrimitive for PthreadAttr {
    const SUPPORTS_SYSTEM_SCOPE: bool = cfg!(any(target_os = "linux", target_os = "macos"));

    fn init(&mut self) -> Result<(), PlatformError> {
        // SAFETY: `inner` is a valid, exclusively borrowed attribute object.
        let rc = unsafe { libc::pthread_attr_init(&mut *self.inner) };
        check("pthread_attr_init", rc)
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    fn set_system_scope(&mut self) -> Result<(), PlatformError> {
        // SAFETY: as above.
        let rc = unsafe {
            scope::pthread_attr_setscope(&mut *self.inner, scope::PTHREAD_SCOPE_SYSTEM)
        };
        check("pthread_attr_setscope", rc)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    fn set_system_scope(&mut self) -> Result<(), PlatformError> {
        Err(PlatformError::CapabilityUnavailable {
            capability: "pthread_attr_setscope".to_string(),
        })
    }

    fn set_stack_size(&mut self, size: usize) -> Result<(), PlatformError> {
        // SAFETY: as above.
        let rc = unsafe { libc::pthread_attr_setstacksize(&mut *self.inner, size) };
        check("pthread_attr_setstacksize", rc)
    }

    fn stack_size(&self) -> Result<usize, PlatformError> {
        let mut size: libc::size_t = 0;
        // SAFETY: `inner` was initialized by `init`; `size` is a valid out pointer.
        let rc = unsafe { libc::pthread_attr_getstacksize(&*self.inner, &mut size) };
        check("pthread_attr_getstacksize", rc)?;
        Ok(size)
    }

    fn destroy(&mut self) -> Result<(), PlatformError> {
        // SAFETY: as above.
        let rc = unsafe { libc::pthread_attr_destroy(&mut *self.inner) };
        check("pthread_attr_destroy", rc)
    }
}
