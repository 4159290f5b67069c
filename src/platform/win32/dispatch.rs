// ── Request dispatch ──────────────────────────────────────────────────────────
//
// Maps a `DialogRequest` onto the matching dialog call.  Everything here is
// safe Rust; the FFI lives in the sibling modules.

use log::info;
use windows::Win32::Foundation::HWND;

use super::{
    dialogs::{choose_color, choose_font, open_file_name, open_file_names, save_file_name},
    folder::open_directory_name,
    message_box::message_box,
    prompt::prompt_dialog,
    registry::RegistryFonts,
};
use crate::{
    error::Result,
    font::FontFileResolver,
    request::{DialogRequest, DialogResponse},
};

/// Show the dialog `request` describes, owned by `owner` (may be null), and
/// report what the user did.
pub fn execute(request: &DialogRequest, owner: HWND) -> Result<DialogResponse> {
    info!("running {} dialog", request.kind());

    let response = match request {
        DialogRequest::OpenFile(opts) => DialogResponse::Path {
            path: open_file_name(opts, owner)?,
        },
        DialogRequest::SaveFile(opts) => DialogResponse::Path {
            path: save_file_name(opts, owner)?,
        },
        DialogRequest::OpenFiles(opts) => DialogResponse::Paths {
            paths: open_file_names(opts, owner)?,
        },
        DialogRequest::Directory { title, initial_dir } => DialogResponse::Path {
            path: open_directory_name(title, initial_dir, owner)?,
        },
        DialogRequest::Color { initial, custom } => {
            let mut custom = *custom;
            let color = choose_color(*initial, &mut custom, owner)?;
            DialogResponse::Color { color, custom }
        }
        DialogRequest::Font => DialogResponse::Font {
            font: choose_font(owner)?,
        },
        DialogRequest::Prompt {
            title,
            message,
            default_content,
        } => DialogResponse::Prompt {
            text: prompt_dialog(title, message, default_content, owner)?,
        },
        DialogRequest::MessageBox {
            title,
            message,
            options,
        } => DialogResponse::MessageBox {
            selected: message_box(title, message, options, owner)?,
        },
        DialogRequest::FontPath { face_name } => DialogResponse::FontPath {
            path: RegistryFonts::new().resolve_font_file(face_name),
        },
    };

    Ok(response)
}
