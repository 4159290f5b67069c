// ── Platform layer ────────────────────────────────────────────────────────────
//
// All FFI lives in the `win32` sub-module and never leaks outward; callers
// only see UTF-8 strings and the crate's own value types.  No `unsafe` lives
// here.

#[cfg(windows)]
pub mod win32;
