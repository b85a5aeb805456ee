//! Call-site attribution for diagnostics
//!
//! Synchronization failures are reported with the file, line and enclosing
//! function of the code that issued the operation. [`call_site!`] captures all
//! three at the point of expansion.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of the code that issued an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub line: u32,
    pub function: Cow<'static, str>,
}

impl CallSite {
    #[must_use]
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file: Cow::Borrowed(file),
            line,
            function: Cow::Borrowed(function),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.file, self.line, self.function)
    }
}

/// Strip the helper item and closure suffixes that `call_site!` leaves on a
/// `type_name` path, leaving the enclosing function.
#[doc(hidden)]
#[must_use]
pub fn trim_function_name(name: &'static str) -> &'static str {
    let mut name = name.strip_suffix("::__site").unwrap_or(name);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name
}

/// Capture the current file, line and enclosing function as a [`CallSite`].
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __site() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::CallSite::new(
            file!(),
            line!(),
            $crate::site::trim_function_name(__type_name_of(__site)),
        )
    }};
}
