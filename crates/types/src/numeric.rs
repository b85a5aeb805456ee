//! Numeric parsing helpers

/// Parse the unsigned decimal prefix of `input` the way `strtoul(s, NULL, 10)`
/// does.
///
/// Leading ASCII whitespace is skipped and one `+` or `-` is accepted. Digits
/// are consumed up to the first non-digit. A leading `-` negates the result
/// with wrap-around. Overflow saturates to `u64::MAX`. Input without digits
/// yields 0.
#[must_use]
pub fn atoul(input: &str) -> u64 {
    let trimmed = input.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    let mut overflowed = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(byte - b'0')))
        {
            Some(next) => value = next,
            None => overflowed = true,
        }
    }

    if !seen_digit {
        0
    } else if overflowed {
        u64::MAX
    } else if negative {
        value.wrapping_neg()
    } else {
        value
    }
}
