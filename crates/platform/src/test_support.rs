//! Fakes and a diagnostics capture shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rmkit_errors::PlatformError;
use rmkit_events::{diagnostics, AppEvent};

use crate::sync::MutexPrimitive;
use crate::thread::AttrPrimitive;

// The diagnostics sink is process-global
static SINK_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with a diagnostics sink installed and return what it reported.
pub(crate) fn capture_diagnostics(f: impl FnOnce()) -> Vec<AppEvent> {
    let _lock = SINK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let (tx, mut rx) = rmkit_events::channel();
    let guard = diagnostics::install(tx);
    f();
    drop(guard);

    let mut events = Vec::new();
    while let Ok(message) = rx.try_recv() {
        events.push(message.event);
    }
    events
}

fn fail(operation: &str, errno: Option<i32>) -> Result<(), PlatformError> {
    match errno {
        Some(errno) => Err(PlatformError::from_errno(operation, errno)),
        None => Ok(()),
    }
}

#[derive(Debug, Default)]
pub(crate) struct FlakyMutex {
    init: Option<i32>,
    lock: Option<i32>,
    unlock: Option<i32>,
    destroy: Option<i32>,
    destroyed: Arc<AtomicUsize>,
}

impl FlakyMutex {
    pub(crate) fn healthy() -> Self {
        Self::default()
    }

    pub(crate) fn failing_lock(errno: i32) -> Self {
        Self {
            lock: Some(errno),
            ..Self::default()
        }
    }

    pub(crate) fn failing_all(errno: i32) -> Self {
        Self {
            init: Some(errno),
            lock: Some(errno),
            unlock: Some(errno),
            destroy: Some(errno),
            ..Self::default()
        }
    }

    pub(crate) fn destroy_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.destroyed)
    }
}

impl MutexPrimitive for FlakyMutex {
    fn init(&self) -> Result<(), PlatformError> {
        fail("pthread_mutex_init", self.init)
    }

    fn destroy(&self) -> Result<(), PlatformError> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        fail("pthread_mutex_destroy", self.destroy)
    }

    fn lock(&self) -> Result<(), PlatformError> {
        fail("pthread_mutex_lock", self.lock)
    }

    fn unlock(&self) -> Result<(), PlatformError> {
        fail("pthread_mutex_unlock", self.unlock)
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeAttr {
    init: Option<i32>,
    setters: Option<i32>,
    destroy: Option<i32>,
    stack_size: Option<usize>,
}

impl FakeAttr {
    pub(crate) fn failing_init(errno: i32) -> Self {
        Self {
            init: Some(errno),
            ..Self::default()
        }
    }

    pub(crate) fn failing_setters(errno: i32) -> Self {
        Self {
            setters: Some(errno),
            ..Self::default()
        }
    }

    pub(crate) fn failing_destroy(errno: i32) -> Self {
        Self {
            destroy: Some(errno),
            ..Self::default()
        }
    }
}

impl AttrPrimitive for FakeAttr {
    const SUPPORTS_SYSTEM_SCOPE: bool = true;

    fn init(&mut self) -> Result<(), PlatformError> {
        fail("pthread_attr_init", self.init)
    }

    fn set_system_scope(&mut self) -> Result<(), PlatformError> {
        fail("pthread_attr_setscope", self.setters)
    }

    fn set_stack_size(&mut self, size: usize) -> Result<(), PlatformError> {
        fail("pthread_attr_setstacksize", self.setters)?;
        self.stack_size = Some(size);
        Ok(())
    }

    fn stack_size(&self) -> Result<usize, PlatformError> {
        Ok(self
            .stack_size
            .unwrap_or(rmkit_config::constants::DEFAULT_STACK_SIZE))
    }

    fn destroy(&mut self) -> Result<(), PlatformError> {
        fail("pthread_attr_destroy", self.destroy)
    }
}
