use rmkit_errors::PlatformError;

use super::MutexPrimitive;

/// Stand-in used when threading support is compiled out.
///
/// Every call succeeds and nothing is excluded. Not an
/// [`ExclusivePrimitive`](super::ExclusivePrimitive), so values guarded by
/// it stay on one thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMutex;

impl MutexPrimitive for NoopMutex {
    fn init(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn destroy(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn lock(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn unlock(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}
