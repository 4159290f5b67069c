// ── File-type filters ─────────────────────────────────────────────────────────
//
// Callers describe filters as `"description|pattern"` strings, e.g.
// `"Images(*.bmp;*.jpg)|*.bmp;*.jpg"`.  The common dialogs want them as one
// wide buffer of NUL-separated pairs ending with a double NUL:
// "Display\0*.ext\0Display2\0*.ext2\0\0"

use crate::{
    encoding::to_wide,
    error::{DialogError, Result},
};

const SEPARATOR: char = '|';

/// One entry of a file dialog's file-type dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Text shown in the dropdown, e.g. `Text Files(*.txt)`.
    pub label: String,
    /// Semicolon-separated glob list, used verbatim, e.g. `*.bmp;*.jpg`.
    pub pattern: String,
}

impl FilterSpec {
    /// Split `entry` on its first `|`.
    pub fn parse(entry: &str) -> Result<Self> {
        let (label, pattern) = entry
            .split_once(SEPARATOR)
            .ok_or_else(|| DialogError::InvalidFilter(entry.to_owned()))?;

        if label.contains('\0') || pattern.contains('\0') {
            return Err(DialogError::InteriorNul { what: "filter" });
        }

        Ok(Self {
            label: label.to_owned(),
            pattern: pattern.to_owned(),
        })
    }

    fn append_wide(&self, out: &mut Vec<u16>) {
        out.extend(to_wide(&self.label));
        out.push(0);
        out.extend(to_wide(&self.pattern));
        out.push(0);
    }
}

/// Build the double-NUL-terminated filter buffer for `lpstrFilter`.
///
/// An empty list yields a lone NUL; the dialog layer passes a null filter
/// pointer in that case.
pub fn build_filter<S: AsRef<str>>(filters: &[S]) -> Result<Vec<u16>> {
    let mut out = Vec::new();
    for entry in filters {
        FilterSpec::parse(entry.as_ref())?.append_wide(&mut out);
    }
    out.push(0);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::to_wide_nul;

    #[test]
    fn parses_label_and_pattern() {
        let spec = FilterSpec::parse("Text(*.txt)|*.txt").unwrap();
        assert_eq!(spec.label, "Text(*.txt)");
        assert_eq!(spec.pattern, "*.txt");
    }

    #[test]
    fn splits_on_first_separator_only() {
        let spec = FilterSpec::parse("Odd|*.a|b").unwrap();
        assert_eq!(spec.label, "Odd");
        assert_eq!(spec.pattern, "*.a|b");
    }

    #[test]
    fn missing_separator_is_input_error() {
        let err = FilterSpec::parse("badfilter").unwrap_err();
        assert!(matches!(err, DialogError::InvalidFilter(ref s) if s == "badfilter"));
        assert!(err.is_input_error());
    }

    #[test]
    fn embedded_nul_is_rejected() {
        let err = FilterSpec::parse("Text\0|*.txt").unwrap_err();
        assert!(matches!(err, DialogError::InteriorNul { .. }));
    }

    #[test]
    fn builds_double_nul_terminated_buffer() {
        let buf = build_filter(&["Text(*.txt)|*.txt", "All Files(*.*)|*.*"]).unwrap();

        let mut expected = to_wide_nul("Text(*.txt)");
        expected.extend(to_wide_nul("*.txt"));
        expected.extend(to_wide_nul("All Files(*.*)"));
        expected.extend(to_wide_nul("*.*"));
        expected.push(0);

        assert_eq!(buf, expected);
        assert_eq!(&buf[buf.len() - 2..], &[0, 0]);
    }

    #[test]
    fn empty_list_is_lone_nul() {
        let empty: [&str; 0] = [];
        assert_eq!(build_filter(&empty).unwrap(), vec![0]);
    }

    #[test]
    fn one_bad_entry_fails_the_whole_list() {
        let err = build_filter(&["Text(*.txt)|*.txt", "badfilter"]).unwrap_err();
        assert!(matches!(err, DialogError::InvalidFilter(_)));
    }
}
