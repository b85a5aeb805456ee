//! Reserved sentinel values and the tolerance-based guard used to detect them
//!
//! Numeric fields throughout the daemon store [`NO_VAL`] ("not set") or
//! [`INFINITE`] ("unbounded") instead of a measured quantity. Once such a
//! value has been copied into an `f32`/`f64` field it can no longer be
//! compared exactly, so float fields are tested with [`fuzzy_equal`].

use serde::{Deserialize, Serialize};

/// "Not set" marker for 32-bit fields.
pub const NO_VAL: u32 = 0xffff_fffe;
/// "Unbounded" marker for 32-bit fields.
pub const INFINITE: u32 = 0xffff_ffff;
/// "Not set" marker for 64-bit fields.
pub const NO_VAL64: u64 = 0xffff_ffff_ffff_fffe;
/// "Unbounded" marker for 64-bit fields.
pub const INFINITE64: u64 = 0xffff_ffff_ffff_ffff;

/// [`NO_VAL`] as stored in a floating point field.
pub const NO_VAL_F64: f64 = 4_294_967_294.0;
/// [`INFINITE`] as stored in a floating point field.
pub const INFINITE_F64: f64 = 4_294_967_295.0;

/// Half-width of the tolerance window used by [`fuzzy_equal`].
pub const FUZZY_EPSILON: f64 = 0.00001;

/// Returns true iff `|v1 - v2| < FUZZY_EPSILON`.
///
/// The relation is symmetric but not transitive. Use it for sentinel
/// detection only: unrelated values closer than the window compare equal too.
/// NaN never compares equal.
#[must_use]
pub fn fuzzy_equal(v1: f64, v2: f64) -> bool {
    let delta = v1 - v2;
    delta > -FUZZY_EPSILON && delta < FUZZY_EPSILON
}

/// True when `value` holds the "not set" marker.
#[must_use]
pub fn is_no_val(value: f64) -> bool {
    fuzzy_equal(value, NO_VAL_F64)
}

/// True when `value` holds the "unbounded" marker.
#[must_use]
pub fn is_infinite(value: f64) -> bool {
    fuzzy_equal(value, INFINITE_F64)
}

/// The out-of-band meanings a float field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    NoVal,
    Infinite,
}

impl Sentinel {
    /// Detect which sentinel, if any, a float field holds.
    #[must_use]
    pub fn classify(value: f64) -> Option<Self> {
        if is_no_val(value) {
            Some(Self::NoVal)
        } else if is_infinite(value) {
            Some(Self::Infinite)
        } else {
            None
        }
    }

    /// The float projection of this sentinel.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::NoVal => NO_VAL_F64,
            Self::Infinite => INFINITE_F64,
        }
    }
}
