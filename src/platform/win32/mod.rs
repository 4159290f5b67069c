// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the crate where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod dialogs; // common open/save/color/font dialogs
pub mod dispatch; // run a `DialogRequest`
pub mod folder; // shell folder browser
pub mod message_box; // hand-built option message box
pub mod prompt; // hand-built text prompt
pub mod registry; // font registrations

pub(crate) mod window; // shared modal-window plumbing
