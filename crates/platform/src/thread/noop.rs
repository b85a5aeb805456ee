use rmkit_errors::PlatformError;

use super::AttrPrimitive;

/// Attribute set used when threading support is compiled out.
///
/// Remembers the requested stack size so threads still get it from
/// `std::thread::Builder`; scope is not applicable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAttr {
    stack_size: Option<usize>,
}

impl AttrPrimitive for NoopAttr {
    const SUPPORTS_SYSTEM_SCOPE: bool = false;

    fn init(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn set_system_scope(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn set_stack_size(&mut self, size: usize) -> Result<(), PlatformError> {
        self.stack_size = Some(size);
        Ok(())
    }

    fn stack_size(&self) -> Result<usize, PlatformError> {
        Ok(self
            .stack_size
            .unwrap_or(rmkit_config::constants::DEFAULT_STACK_SIZE))
    }

    fn destroy(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }
}
