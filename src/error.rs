// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in commdlg return `error::Result<T>`.  Two kinds of
// failure are kept apart: caller-input errors (bad filter strings, oversized
// defaults) and platform errors (conversion failures, dialog failures with a
// non-zero extended error).  User cancellation is never an error.

use std::string::FromUtf16Error;

/// Every error that commdlg can produce.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    /// A filter entry did not contain the `|` separator.
    #[error(
        "invalid filter format: '{0}'. Use 'description|filter pattern' \
         (e.g. 'Text Files(*.txt)|*.txt')"
    )]
    InvalidFilter(String),

    /// A caller-supplied string does not fit the buffer the OS is given.
    #[error("{what} is too long ({len} UTF-16 units, limit {limit})")]
    InputTooLong {
        what: &'static str,
        len: usize,
        limit: usize,
    },

    /// A caller-supplied string contains a NUL, which would corrupt a
    /// NUL-separated native buffer.
    #[error("{what} contains an embedded NUL character")]
    InteriorNul { what: &'static str },

    /// UTF-16 text returned by the OS was not valid Unicode.
    #[error("wide to UTF-8 conversion failed: {0}")]
    Encoding(#[from] FromUtf16Error),

    /// A common dialog reported failure and `CommDlgExtendedError` returned a
    /// non-zero code.
    #[error("{dialog} failed (extended error {code:#06x})")]
    Dialog {
        /// The name of the failing dialog function.
        dialog: &'static str,
        /// The raw `CommDlgExtendedError()` value.
        code: u32,
    },

    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A request file could not be parsed.
    #[error("invalid dialog request: {0}")]
    Config(#[from] serde_json::Error),

    /// A standard I/O error (reading a request file, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DialogError {
    /// `true` for errors caused by malformed caller input rather than by the
    /// platform.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilter(_) | Self::InputTooLong { .. } | Self::InteriorNul { .. }
        )
    }
}

// Convert a windows-crate error (HRESULT) directly into a DialogError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for DialogError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DialogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_distinguished() {
        assert!(DialogError::InvalidFilter("x".into()).is_input_error());
        assert!(DialogError::InteriorNul { what: "title" }.is_input_error());
        assert!(DialogError::InputTooLong {
            what: "default file name",
            len: 5000,
            limit: 4096,
        }
        .is_input_error());
        assert!(!DialogError::Dialog {
            dialog: "GetOpenFileNameW",
            code: 0x3003,
        }
        .is_input_error());
    }

    #[test]
    fn dialog_error_formats_code_in_hex() {
        let e = DialogError::Dialog {
            dialog: "ChooseColorW",
            code: 0x0002,
        };
        assert_eq!(e.to_string(), "ChooseColorW failed (extended error 0x0002)");
    }

    #[test]
    fn invalid_filter_names_the_entry() {
        let e = DialogError::InvalidFilter("badfilter".into());
        assert!(e.to_string().contains("'badfilter'"));
    }
}
