//! Bounded time formatting
//!
//! [`format_bounded`] renders an `strftime`-style pattern into a fixed
//! caller buffer. The buffer is always NUL-terminated. When the pattern
//! cannot be rendered, or its output does not fit, the buffer is filled with
//! `#` instead so a truncated timestamp is never mistaken for a real one.

use std::fmt::{self, Write as _};

use chrono::{DateTime, TimeZone};
use rmkit_events::{diagnostics, AppEvent, PlatformEvent};

/// Smallest intermediate buffer used for rendering, whatever the caller's size.
pub const SCRATCH_MIN: usize = 256;

/// Byte written over the whole buffer when rendering fails.
pub const FALLBACK_FILL: u8 = b'#';

/// Render `time` with `format` into the first `max` bytes of `dst`.
///
/// `max` is clamped to `dst.len()`. Returns the number of bytes before the
/// terminating NUL; the rest of the first `max` bytes are zeroed. A `max` of
/// zero or less writes nothing and returns 0.
pub fn format_bounded<Tz>(dst: &mut [u8], max: isize, format: &str, time: &DateTime<Tz>) -> usize
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Ok(max) = usize::try_from(max) else {
        return 0;
    };
    let max = max.min(dst.len());
    if max == 0 {
        return 0;
    }

    let capacity = if max < SCRATCH_MIN { SCRATCH_MIN } else { max + 1 };
    let mut scratch = vec![0_u8; capacity];

    if let Some(text) = render(format, time, capacity) {
        scratch[..text.len()].copy_from_slice(text.as_bytes());
    } else {
        scratch[..max].fill(FALLBACK_FILL);
        diagnostics::report(AppEvent::Platform(PlatformEvent::TimeFormatFallback {
            format: format.to_string(),
            max,
        }));
    }
    scratch[max - 1] = 0;

    // Copy up to the first NUL, then pad, as strncpy does.
    let len = scratch[..max]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(max - 1);
    dst[..len].copy_from_slice(&scratch[..len]);
    dst[len..max].fill(0);
    len
}

/// Render into a fresh buffer of `max` bytes and return the text before the
/// terminating NUL.
#[must_use]
pub fn format_time<Tz>(max: usize, format: &str, time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut buf = vec![0_u8; max];
    let len = format_bounded(
        &mut buf,
        isize::try_from(max).unwrap_or(isize::MAX),
        format,
        time,
    );
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

/// `None` when the pattern is invalid, renders to nothing, or would not fit
/// `capacity` bytes including the terminator.
fn render<Tz>(format: &str, time: &DateTime<Tz>, capacity: usize) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", time.format(format)).ok()?;
    if out.is_empty() || out.len() >= capacity {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_diagnostics;
    use chrono::Utc;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap()
    }

    #[test]
    fn test_fits() {
        let mut buf = [0xAA_u8; 32];
        let len = format_bounded(&mut buf, 32, "%Y-%m-%d %H:%M:%S", &sample_time());
        assert_eq!(len, 19);
        assert_eq!(&buf[..len], b"2024-03-09 14:05:30");
        assert!(buf[len..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_truncated_to_max_minus_one() {
        let mut buf = [0xAA_u8; 8];
        let len = format_bounded(&mut buf, 8, "%Y-%m-%d", &sample_time());
        assert_eq!(len, 7);
        assert_eq!(&buf[..7], b"2024-03");
        assert_eq!(buf[7], 0);
    }

    #[test]
    fn test_oversized_output_falls_back_to_hashes() {
        let pattern = "x".repeat(300);
        let mut buf = [0_u8; 10];
        let events = capture_diagnostics(|| {
            assert_eq!(format_bounded(&mut buf, 10, &pattern, &sample_time()), 9);
        });
        assert_eq!(&buf[..9], b"#########");
        assert_eq!(buf[9], 0);
        assert!(events.iter().any(|event| matches!(
            event,
            AppEvent::Platform(PlatformEvent::TimeFormatFallback { max: 10, .. })
        )));
    }

    #[test]
    fn test_invalid_specifier_falls_back_to_hashes() {
        let mut buf = [0_u8; 10];
        format_bounded(&mut buf, 10, "%Q", &sample_time());
        assert_eq!(&buf, b"#########\0");
    }

    #[test]
    fn test_empty_output_falls_back_to_hashes() {
        assert_eq!(format_time(4, "", &sample_time()), "###");
    }

    #[test]
    fn test_non_positive_max_writes_nothing() {
        let mut buf = [0xAA_u8; 16];
        assert_eq!(format_bounded(&mut buf, 0, "%Y", &sample_time()), 0);
        assert_eq!(format_bounded(&mut buf, -5, "%Y", &sample_time()), 0);
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_max_clamped_to_buffer() {
        let mut buf = [0_u8; 5];
        let len = format_bounded(&mut buf, 1000, "%Y-%m-%d", &sample_time());
        assert_eq!(len, 4);
        assert_eq!(&buf, b"2024\0");
    }

    #[test]
    fn test_max_one_yields_empty_string() {
        let mut buf = [0xAA_u8; 1];
        assert_eq!(format_bounded(&mut buf, 1, "%Y", &sample_time()), 0);
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn test_large_buffer_uses_max_plus_one_scratch() {
        let pattern = "y".repeat(400);
        let rendered = format_time(512, &pattern, &sample_time());
        assert_eq!(rendered, pattern);

        let rendered = format_time(400, &pattern, &sample_time());
        assert_eq!(rendered.len(), 399);
        assert!(rendered.bytes().all(|b| b == b'y'));
    }
}
