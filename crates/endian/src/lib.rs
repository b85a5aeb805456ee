#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! 64-bit byte order conversion for rmkit
//!
//! Serialized records carry 64-bit integers in big-endian ("network") order.
//! Producers convert with [`hton_u64`]/[`hton_i64`] and consumers with
//! [`ntoh_u64`]/[`ntoh_i64`]. Both directions are the same byte swap on a
//! little-endian host and the identity on a big-endian one.

use serde::{Deserialize, Serialize};

/// Byte ordering of a multi-byte integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// Canonical wire/storage order.
    pub const NETWORK: Self = Self::Big;

    /// Order of the machine this was compiled for.
    pub const HOST: Self = if cfg!(target_endian = "big") {
        Self::Big
    } else {
        Self::Little
    };
}

/// Reverse the eight bytes of `val` end-for-end.
#[must_use]
pub const fn swap_u64(val: u64) -> u64 {
    ((val & 0x0000_0000_0000_00ff) << 56)
        | ((val & 0x0000_0000_0000_ff00) << 40)
        | ((val & 0x0000_0000_00ff_0000) << 24)
        | ((val & 0x0000_0000_ff00_0000) << 8)
        | ((val >> 8) & 0x0000_0000_ff00_0000)
        | ((val >> 24) & 0x0000_0000_00ff_0000)
        | ((val >> 40) & 0x0000_0000_0000_ff00)
        | ((val >> 56) & 0x0000_0000_0000_00ff)
}

/// Convert between `host` order and network order.
#[must_use]
pub const fn convert_u64(val: u64, host: ByteOrder) -> u64 {
    match host {
        ByteOrder::Big => val,
        ByteOrder::Little => swap_u64(val),
    }
}

/// Signed variant of [`convert_u64`]; the swap ignores the sign bit's meaning.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub const fn convert_i64(val: i64, host: ByteOrder) -> i64 {
    convert_u64(val as u64, host) as i64
}

#[must_use]
pub const fn hton_u64(val: u64) -> u64 {
    convert_u64(val, ByteOrder::HOST)
}

#[must_use]
pub const fn ntoh_u64(val: u64) -> u64 {
    convert_u64(val, ByteOrder::HOST)
}

#[must_use]
pub const fn hton_i64(val: i64) -> i64 {
    convert_i64(val, ByteOrder::HOST)
}

#[must_use]
pub const fn ntoh_i64(val: i64) -> i64 {
    convert_i64(val, ByteOrder::HOST)
}

/// Integers that can be moved to and from network order.
pub trait NetworkOrder: Copy {
    #[must_use]
    fn to_network(self) -> Self;

    #[must_use]
    fn from_network(self) -> Self;
}

impl NetworkOrder for u64 {
    fn to_network(self) -> Self {
        hton_u64(self)
    }

    fn from_network(self) -> Self {
        ntoh_u64(self)
    }
}

impl NetworkOrder for i64 {
    fn to_network(self) -> Self {
        hton_i64(self)
    }

    fn from_network(self) -> Self {
        ntoh_i64(self)
    }
}

/// Write `val` in network order into the first eight bytes of `buf`.
///
/// Returns `None` when `buf` is shorter than eight bytes.
#[must_use]
pub fn put_u64(buf: &mut [u8], val: u64) -> Option<()> {
    let dst = buf.get_mut(..8)?;
    dst.copy_from_slice(&hton_u64(val).to_ne_bytes());
    Some(())
}

/// Read a network-order value from the first eight bytes of `buf`.
///
/// Returns `None` when `buf` is shorter than eight bytes.
#[must_use]
pub fn get_u64(buf: &[u8]) -> Option<u64> {
    let src: [u8; 8] = buf.get(..8)?.try_into().ok()?;
    Some(ntoh_u64(u64::from_ne_bytes(src)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_known_value() {
        assert_eq!(swap_u64(0x0102_0304_0506_0708), 0x0807_0605_0403_0201);
        assert_eq!(swap_u64(0), 0);
        assert_eq!(swap_u64(u64::MAX), u64::MAX);
        assert_eq!(swap_u64(0xff), 0xff00_0000_0000_0000);
    }

    #[test]
    fn test_host_constant_matches_target() {
        assert_eq!(ByteOrder::HOST == ByteOrder::Little, cfg!(target_endian = "little"));
    }

    #[test]
    fn test_signed_swap() {
        assert_eq!(convert_i64(-1, ByteOrder::Little), -1);
        assert_eq!(convert_i64(1, ByteOrder::Little), 0x0100_0000_0000_0000);
        assert_eq!(convert_i64(i64::MIN, ByteOrder::Little), 0x80);
    }

    #[test]
    fn test_short_buffers() {
        let mut short = [0u8; 7];
        assert!(put_u64(&mut short, 1).is_none());
        assert!(get_u64(&short).is_none());
    }
}
