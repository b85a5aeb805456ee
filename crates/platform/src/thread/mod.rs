//! Thread-creation attributes
//!
//! [`ThreadAttr`] prepares the attribute set daemon threads are created with:
//! system contention scope where the platform has it, and the configured
//! stack size. Failing to create the attribute set is fatal; everything after
//! that is logged and the platform default is kept.

mod noop;
#[cfg(all(unix, feature = "threads"))]
mod pthread;

pub use noop::NoopAttr;
#[cfg(all(unix, feature = "threads"))]
pub use pthread::PthreadAttr;

use std::thread::JoinHandle;

use rmkit_config::ThreadConfig;
use rmkit_errors::PlatformError;
use rmkit_events::{diagnostics, AppEvent, PlatformEvent, SyncPrimitive};
use rmkit_types::CallSite;

use crate::report::{report_failure, report_fatal};

/// Attribute backend selected by the `threads` feature.
#[cfg(all(unix, feature = "threads"))]
pub type DefaultAttr = PthreadAttr;

/// Attribute backend selected by the `threads` feature.
#[cfg(not(all(unix, feature = "threads")))]
pub type DefaultAttr = NoopAttr;

/// Raw thread-attribute capability.
pub trait AttrPrimitive: Send {
    /// Whether [`AttrPrimitive::set_system_scope`] can succeed on this platform.
    const SUPPORTS_SYSTEM_SCOPE: bool;

    /// # Errors
    ///
    /// Returns the OS error when the attribute set cannot be created.
    fn init(&mut self) -> Result<(), PlatformError>;

    /// # Errors
    ///
    /// Returns the OS error when system contention scope is refused.
    fn set_system_scope(&mut self) -> Result<(), PlatformError>;

    /// # Errors
    ///
    /// Returns the OS error when `size` is refused.
    fn set_stack_size(&mut self, size: usize) -> Result<(), PlatformError>;

    /// Stack size the attribute set currently carries.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the value cannot be read back.
    fn stack_size(&self) -> Result<usize, PlatformError>;

    /// # Errors
    ///
    /// Returns the OS error when the attribute set cannot be released.
    fn destroy(&mut self) -> Result<(), PlatformError>;
}

/// What happens when an unrecoverable primitive failure occurs.
pub trait Terminate {
    fn terminate(&self, operation: &str, site: CallSite, err: &PlatformError) -> !;
}

/// Log the failure as fatal and exit the process with status 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    fn terminate(&self, operation: &str, site: CallSite, err: &PlatformError) -> ! {
        report_fatal(operation, site, err);
        std::process::exit(1)
    }
}

/// An initialized attribute set.
///
/// Each set serves exactly one thread creation: [`ThreadAttr::spawn`]
/// consumes it and releases it afterwards. [`ThreadAttr::destroy`] releases
/// it without spawning, and dropping it does the same against the init site.
pub struct ThreadAttr<A: AttrPrimitive = DefaultAttr> {
    raw: A,
    site: CallSite,
    destroyed: bool,
}

impl<A: AttrPrimitive + Default> ThreadAttr<A> {
    /// Create the attribute set for `config`.
    ///
    /// If the attribute set cannot be created, `terminate` is invoked and
    /// this function does not return.
    #[must_use]
    pub fn init(config: &ThreadConfig, site: CallSite, terminate: &dyn Terminate) -> Self {
        Self::init_with(A::default(), config, site, terminate)
    }
}

impl<A: AttrPrimitive> ThreadAttr<A> {
    #[must_use]
    pub fn init_with(
        mut raw: A,
        config: &ThreadConfig,
        site: CallSite,
        terminate: &dyn Terminate,
    ) -> Self {
        if let Err(err) = raw.init() {
            report_failure(
                SyncPrimitive::ThreadAttr,
                "pthread_attr_init",
                site.clone(),
                &err,
                None,
            );
            terminate.terminate("pthread_attr_init", site, &err);
        }

        if config.system_scope && A::SUPPORTS_SYSTEM_SCOPE {
            if let Err(err) = raw.set_system_scope() {
                report_failure(
                    SyncPrimitive::ThreadAttr,
                    "pthread_attr_setscope",
                    site.clone(),
                    &err,
                    Some("default contention scope kept"),
                );
            }
        }

        if let Err(err) = raw.set_stack_size(config.stack_size) {
            report_failure(
                SyncPrimitive::ThreadAttr,
                "pthread_attr_setstacksize",
                site.clone(),
                &err,
                Some("default stack size kept"),
            );
        }

        tracing::debug!(
            stack_size = config.stack_size,
            system_scope = config.system_scope && A::SUPPORTS_SYSTEM_SCOPE,
            site = %site,
            "thread attributes initialized"
        );
        Self {
            raw,
            site,
            destroyed: false,
        }
    }

    /// Stack size threads will be created with, if it can be read back.
    #[must_use]
    pub fn stack_size(&self) -> Option<usize> {
        self.raw.stack_size().ok()
    }

    /// Start a named thread with these attributes, then release them.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to create the thread. The attribute
    /// set is released either way.
    pub fn spawn<F, T>(self, name: impl Into<String>, f: F) -> Result<JoinHandle<T>, PlatformError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let name = name.into();
        let mut builder = std::thread::Builder::new().name(name.clone());
        let stack_size = match self.raw.stack_size() {
            Ok(size) => {
                builder = builder.stack_size(size);
                size
            }
            Err(err) => {
                report_failure(
                    SyncPrimitive::ThreadAttr,
                    "pthread_attr_getstacksize",
                    self.site.clone(),
                    &err,
                    Some("thread uses the runtime default stack"),
                );
                0
            }
        };

        let handle = builder
            .spawn(f)
            .map_err(|e| PlatformError::ThreadSpawnFailed {
                name: name.clone(),
                message: e.to_string(),
            })?;

        diagnostics::report(AppEvent::Platform(PlatformEvent::ThreadSpawned {
            name,
            stack_size,
        }));
        let site = self.site.clone();
        self.destroy(site);
        Ok(handle)
    }

    /// Release the attribute set. A failure is logged as a possible leak.
    pub fn destroy(mut self, site: CallSite) {
        self.destroy_raw(site);
    }

    fn destroy_raw(&mut self, site: CallSite) {
        self.destroyed = true;
        if let Err(err) = self.raw.destroy() {
            report_failure(
                SyncPrimitive::ThreadAttr,
                "pthread_attr_destroy",
                site,
                &err,
                Some("possible memory leak"),
            );
        }
    }
}

impl<A: AttrPrimitive> Drop for ThreadAttr<A> {
    fn drop(&mut self) {
        if !self.destroyed {
            let site = self.site.clone();
            self.destroy_raw(site);
        }
    }
}

impl<A: AttrPrimitive> std::fmt::Debug for ThreadAttr<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadAttr")
            .field("site", &self.site)
            .field("stack_size", &self.stack_size())
            .finish_non_exhaustive()
    }
}

/// Create a [`ThreadAttr`] for a [`ThreadConfig`], exiting the process if the
/// attribute set cannot be created.
#[macro_export]
macro_rules! attr_init {
    ($config:expr) => {
        <$crate::thread::ThreadAttr>::init(
            $config,
            $crate::call_site!(),
            &$crate::thread::ProcessExit,
        )
    };
}

/// Destroy a [`ThreadAttr`], logging failures against the current call site.
#[macro_export]
macro_rules! attr_destroy {
    ($attr:expr) => {
        $attr.destroy($crate::call_site!())
    };
}
