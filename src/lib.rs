// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! UTF-8 wrappers around the Windows common dialogs (open, save,
//! multi-select, folder browse, color, font) plus two hand-built modal
//! dialogs: a text prompt and a multi-option message box.
//!
//! Every dialog call blocks the calling thread, pumping messages until the
//! user dismisses it.  Cancellation is a normal `None` / empty result; only
//! malformed input and genuine platform failures are errors.
//!
//! The string handling, filter building, result parsing, font lookup and
//! modal state machines are platform-independent and live at the crate
//! root; the FFI is confined to [`platform::win32`], available on Windows.

pub mod cli;
pub mod color;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod font;
pub mod modal;
pub mod platform;
pub mod request;
pub mod selection;

pub use color::{Color, CustomColors};
pub use error::{DialogError, Result};
pub use filter::{build_filter, FilterSpec};
pub use font::{FontEntry, FontFileResolver, FontScope, FontSelection, FontSource, StaticFontSource};
pub use modal::{
    DialogOption, ModalEvent, ModalSession, ModalState, CLOSED_WITHOUT_SELECTION, NO_OPTIONS,
};
pub use request::{DialogRequest, DialogResponse, FileDialogOptions};

#[cfg(windows)]
pub use platform::win32::{
    dialogs::{choose_color, choose_font, choose_font_with, open_file_name, open_file_names, save_file_name},
    folder::open_directory_name,
    message_box::message_box,
    prompt::prompt_dialog,
    registry::RegistryFonts,
};
