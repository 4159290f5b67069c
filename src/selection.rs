// ── Multi-select result parsing ───────────────────────────────────────────────
//
// With OFN_ALLOWMULTISELECT | OFN_EXPLORER the open dialog fills its buffer
// with "directory\0file1\0file2\0\0".  When exactly one file is picked the OS
// skips the split and writes the full path alone: "C:\dir\file\0\0".

use crate::{encoding::from_wide, error::Result};

/// Separator used to re-join the shared directory with each file name.
const PATH_SEPARATOR: char = '\\';

/// Rebuild absolute paths from a multi-select buffer.
///
/// Returns an empty list if the buffer starts with a NUL.
pub fn parse_multi_select(buf: &[u16]) -> Result<Vec<String>> {
    let mut tokens = buf.split(|&c| c == 0);

    let directory = match tokens.next() {
        Some(dir) if !dir.is_empty() => from_wide(dir)?,
        _ => return Ok(Vec::new()),
    };

    let names: Vec<&[u16]> = tokens.take_while(|t| !t.is_empty()).collect();
    if names.is_empty() {
        return Ok(vec![directory]);
    }

    names
        .into_iter()
        .map(|name| from_wide(name).map(|name| join(&directory, &name)))
        .collect()
}

fn join(directory: &str, name: &str) -> String {
    // Drive roots come back as "C:\" and already end with the separator.
    if directory.ends_with(PATH_SEPARATOR) {
        format!("{directory}{name}")
    } else {
        format!("{directory}{PATH_SEPARATOR}{name}")
    }
}
