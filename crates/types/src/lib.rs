#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for rmkit
//!
//! This crate provides the plain-data types shared across the workspace:
//! sentinel constants and the fuzzy equality guard, call-site attribution for
//! diagnostics, numeric parsing helpers, and the accounting resource records.

pub mod numeric;
pub mod resource;
pub mod sentinel;
pub mod site;

// Re-export commonly used types
pub use numeric::atoul;
pub use resource::{
    ClusterResourceCondition, ClusterResourceRecord, ResourceKind, ServiceResourceCondition,
    ServiceResourceRecord,
};
pub use sentinel::{
    fuzzy_equal, is_infinite, is_no_val, Sentinel, FUZZY_EPSILON, INFINITE, INFINITE64,
    INFINITE_F64, NO_VAL, NO_VAL64, NO_VAL_F64,
};
pub use site::CallSite;
