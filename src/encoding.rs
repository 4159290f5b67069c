// ── Text encoding ─────────────────────────────────────────────────────────────
//
// UTF-8 ⇄ UTF-16 helpers for every `*W` API call.  Rust strings are always
// valid UTF-8, so the narrow-to-wide direction cannot fail; the reverse
// direction rejects unpaired surrogates instead of replacing them.

use crate::error::{DialogError, Result};

/// Encode `s` as UTF-16 without a terminator.
pub fn to_wide(s: &str) -> Vec<u16> {
    if s.is_empty() {
        return Vec::new();
    }
    s.encode_utf16().collect()
}

/// Encode `s` as a NUL-terminated UTF-16 string, ready for a `PCWSTR`.
pub fn to_wide_nul(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// [`to_wide_nul`] for caller-supplied text, which must not contain a NUL:
/// the OS would silently stop reading at it.
pub fn to_wide_checked(s: &str, what: &'static str) -> Result<Vec<u16>> {
    if s.contains('\0') {
        return Err(DialogError::InteriorNul { what });
    }
    Ok(to_wide_nul(s))
}

/// Decode UTF-16 text to UTF-8.
///
/// Fails with [`DialogError::Encoding`](crate::DialogError::Encoding) on
/// invalid UTF-16; never truncates.
pub fn from_wide(wide: &[u16]) -> Result<String> {
    if wide.is_empty() {
        return Ok(String::new());
    }
    Ok(String::from_utf16(wide)?)
}

/// Decode a NUL-terminated UTF-16 buffer, stopping at the first NUL (or the
/// end of the slice if there is none).
pub fn from_wide_nul(buf: &[u16]) -> Result<String> {
    from_wide(until_nul(buf))
}

/// The prefix of `buf` before its first NUL.
pub(crate) fn until_nul(buf: &[u16]) -> &[u16] {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    &buf[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_maps_to_empty() {
        assert!(to_wide("").is_empty());
        assert_eq!(to_wide_nul(""), vec![0]);
        assert_eq!(from_wide(&[]).unwrap(), "");
        assert_eq!(from_wide_nul(&[0, 0]).unwrap(), "");
    }

    #[test]
    fn non_bmp_text_round_trips() {
        let text = "字体 🎨 Ünïcödé";
        assert_eq!(from_wide(&to_wide(text)).unwrap(), text);
    }

    #[test]
    fn nul_terminated_stops_at_first_nul() {
        let mut buf = to_wide_nul("C:\\dir");
        buf.extend(to_wide_nul("ignored"));
        assert_eq!(from_wide_nul(&buf).unwrap(), "C:\\dir");
    }

    #[test]
    fn unterminated_buffer_reads_whole_slice() {
        assert_eq!(from_wide_nul(&to_wide("abc")).unwrap(), "abc");
    }

    #[test]
    fn checked_rejects_interior_nul() {
        let err = to_wide_checked("Pick\0one", "title").unwrap_err();
        assert!(matches!(err, DialogError::InteriorNul { what: "title" }));
        assert!(err.is_input_error());
        assert_eq!(to_wide_checked("ok", "title").unwrap(), to_wide_nul("ok"));
    }

    #[test]
    fn unpaired_surrogate_is_an_error() {
        let err = from_wide(&[0x0041, 0xD800, 0x0042]).unwrap_err();
        assert!(matches!(err, crate::DialogError::Encoding(_)));
        assert!(!err.is_input_error());
    }

    proptest! {
        #[test]
        fn utf8_wide_round_trip(s in any::<String>()) {
            prop_assert_eq!(from_wide(&to_wide(&s)).unwrap(), s);
        }
    }
}
