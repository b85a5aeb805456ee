//! Integration tests for the byte order codec

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rmkit_endian::*;

    proptest! {
        #[test]
        fn prop_swap_is_involution(x in any::<u64>()) {
            prop_assert_eq!(swap_u64(swap_u64(x)), x);
        }

        #[test]
        fn prop_swap_matches_byte_reversal(x in any::<u64>()) {
            prop_assert_eq!(swap_u64(x), x.swap_bytes());
        }

        #[test]
        fn prop_identity_on_big_endian_host(x in any::<u64>(), y in any::<i64>()) {
            prop_assert_eq!(convert_u64(x, ByteOrder::Big), x);
            prop_assert_eq!(convert_i64(y, ByteOrder::Big), y);
        }

        #[test]
        fn prop_network_order_is_big_endian(x in any::<u64>()) {
            prop_assert_eq!(hton_u64(x).to_ne_bytes(), x.to_be_bytes());
            prop_assert_eq!(ntoh_u64(hton_u64(x)), x);
        }

        #[test]
        fn prop_signed_round_trip(x in any::<i64>()) {
            prop_assert_eq!(ntoh_i64(hton_i64(x)), x);
            prop_assert_eq!(x.to_network().from_network(), x);
        }

        #[test]
        fn prop_buffer_layout(x in any::<u64>()) {
            let mut buf = [0u8; 12];
            put_u64(&mut buf, x).unwrap();
            prop_assert_eq!(&buf[..8], &x.to_be_bytes()[..]);
            prop_assert_eq!(get_u64(&buf), Some(x));
        }
    }

    #[test]
    fn test_byte_order_serialization() {
        let json = serde_json::to_string(&ByteOrder::NETWORK).unwrap();
        assert_eq!(json, r#""big""#);
    }
}
