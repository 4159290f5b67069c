// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 common-dialog APIs.  Each function returns
// `Ok(Some(..))` on user confirmation and `Ok(None)` (or an empty list) on
// cancel.  A negative result with a non-zero `CommDlgExtendedError()` is a
// real failure and surfaces as `DialogError::Dialog`.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use log::{debug, info, warn};
use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::{COLORREF, HWND},
        Graphics::Gdi::LOGFONTW,
        UI::Controls::Dialogs::{
            ChooseColorW, ChooseFontW, CommDlgExtendedError, GetOpenFileNameW, GetSaveFileNameW,
            CC_FULLOPEN, CC_RGBINIT, CF_NOVERTFONTS, CF_SCREENFONTS, CF_TTONLY, CHOOSECOLORW,
            CHOOSEFONTW, OFN_ALLOWMULTISELECT, OFN_EXPLORER, OFN_FILEMUSTEXIST, OFN_NOCHANGEDIR,
            OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW, OPEN_FILENAME_FLAGS,
        },
    },
};

use super::registry::RegistryFonts;
use crate::{
    color::{Color, CustomColors},
    encoding::{from_wide_nul, to_wide, to_wide_checked},
    error::{DialogError, Result},
    filter::build_filter,
    font::{point_size_from_tenths, FontFileResolver, FontSelection},
    request::FileDialogOptions,
    selection::parse_multi_select,
};

// ── Buffer sizes ──────────────────────────────────────────────────────────────

/// Capacity of the single-file result buffer in `WCHAR`s, including the
/// null terminator.
const PATH_BUF_LEN: usize = 4096;

/// Capacity of the multi-select result buffer in `WCHAR`s; it holds the
/// directory plus every selected file name.
const MULTI_PATH_BUF_LEN: usize = 65_536;

// ── File dialogs ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum FileDialogKind {
    Open,
    Save,
}

impl FileDialogKind {
    fn function(self) -> &'static str {
        match self {
            Self::Open => "GetOpenFileNameW",
            Self::Save => "GetSaveFileNameW",
        }
    }
}

/// Show the standard "Open" dialog for one existing file.
///
/// Returns the chosen path, or `None` if the user cancelled.
pub fn open_file_name(opts: &FileDialogOptions, owner: HWND) -> Result<Option<String>> {
    let flags = OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_NOCHANGEDIR | OFN_EXPLORER;
    show_file_dialog(FileDialogKind::Open, opts, owner, PATH_BUF_LEN, flags)?
        .map(|buf| from_wide_nul(&buf))
        .transpose()
}

/// Show the standard "Save As" dialog.
///
/// The OS asks before overwriting an existing file.  Returns the chosen
/// path, or `None` if the user cancelled.
pub fn save_file_name(opts: &FileDialogOptions, owner: HWND) -> Result<Option<String>> {
    let flags = OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST | OFN_NOCHANGEDIR | OFN_EXPLORER;
    show_file_dialog(FileDialogKind::Save, opts, owner, PATH_BUF_LEN, flags)?
        .map(|buf| from_wide_nul(&buf))
        .transpose()
}

/// Show the "Open" dialog with multi-select enabled.
///
/// Returns absolute paths in the order the OS reports them; empty if the
/// user cancelled.
pub fn open_file_names(opts: &FileDialogOptions, owner: HWND) -> Result<Vec<String>> {
    let flags = OFN_FILEMUSTEXIST
        | OFN_PATHMUSTEXIST
        | OFN_NOCHANGEDIR
        | OFN_EXPLORER
        | OFN_ALLOWMULTISELECT;
    match show_file_dialog(FileDialogKind::Open, opts, owner, MULTI_PATH_BUF_LEN, flags)? {
        Some(buf) => parse_multi_select(&buf),
        None => Ok(Vec::new()),
    }
}

/// Marshal `opts` into an `OPENFILENAMEW`, run the dialog and hand back the
/// filled result buffer.  `None` means the user cancelled.
fn show_file_dialog(
    kind: FileDialogKind,
    opts: &FileDialogOptions,
    owner: HWND,
    capacity: usize,
    flags: OPEN_FILENAME_FLAGS,
) -> Result<Option<Vec<u16>>> {
    // A null filter pointer shows no file-type dropdown at all.
    let filter = if opts.filters.is_empty() {
        None
    } else {
        Some(build_filter(&opts.filters)?)
    };
    let title = optional_wide(&opts.title, "title")?;
    let initial_dir = optional_wide(&opts.initial_dir, "initial directory")?;
    let default_ext = optional_wide(&opts.default_ext, "default extension")?;
    let mut buf = file_buffer(&opts.default_file_name, capacity)?;

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: owner,
        lpstrFilter: pcwstr_or_null(filter.as_deref()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        // capacity is at most MULTI_PATH_BUF_LEN; the cast is lossless.
        nMaxFile: capacity as u32,
        lpstrInitialDir: pcwstr_or_null(initial_dir.as_deref()),
        lpstrTitle: pcwstr_or_null(title.as_deref()),
        lpstrDefExt: pcwstr_or_null(default_ext.as_deref()),
        Flags: flags,
        ..Default::default()
    };

    debug!("{} ({} filters)", kind.function(), opts.filters.len());

    // SAFETY: `ofn` is fully initialised; `buf`, `filter`, `title`,
    // `initial_dir` and `default_ext` outlive this call and every non-null
    // string pointer is NUL-terminated.  The dialog writes at most
    // `nMaxFile` WCHARs into `buf`.  Called on the caller's UI thread
    // (required for modal dialogs).
    let ok = unsafe {
        match kind {
            FileDialogKind::Open => GetOpenFileNameW(&mut ofn),
            FileDialogKind::Save => GetSaveFileNameW(&mut ofn),
        }
    };

    if ok.as_bool() {
        Ok(Some(buf))
    } else {
        cancelled_or_failed(kind.function()).map(|()| None)
    }
}

// ── Color dialog ──────────────────────────────────────────────────────────────

/// Show the color picker, pre-selecting `initial` and with the custom
/// palette expanded.
///
/// `custom` provides the 16 custom-color slots and receives any edits the
/// user made to them.  Returns the picked color (always opaque), or `None`
/// if the user cancelled.
pub fn choose_color(
    initial: Color,
    custom: &mut CustomColors,
    owner: HWND,
) -> Result<Option<Color>> {
    let mut slots = custom.0.map(COLORREF);

    let mut cc = CHOOSECOLORW {
        lStructSize: std::mem::size_of::<CHOOSECOLORW>() as u32,
        hwndOwner: owner,
        rgbResult: COLORREF(initial.to_colorref()),
        lpCustColors: slots.as_mut_ptr(),
        Flags: CC_RGBINIT | CC_FULLOPEN,
        ..Default::default()
    };

    debug!("ChooseColorW (initial {initial:?})");

    // SAFETY: `cc` is fully initialised and `slots` is the 16-entry array
    // the API requires; both outlive the call.
    let ok = unsafe { ChooseColorW(&mut cc) };

    custom.0 = slots.map(|c| c.0);

    if ok.as_bool() {
        Ok(Some(Color::from_colorref(cc.rgbResult.0)))
    } else {
        cancelled_or_failed("ChooseColorW").map(|()| None)
    }
}

// ── Font dialog ───────────────────────────────────────────────────────────────

/// Show the font picker (screen TrueType fonts, no vertical faces) and look
/// the chosen face up in the font registry.
///
/// The file path is a best guess; see [`FontSelection::path`].
pub fn choose_font(owner: HWND) -> Result<Option<FontSelection>> {
    choose_font_with(owner, &RegistryFonts::new())
}

/// [`choose_font`] with a caller-supplied face-name → file resolver.
pub fn choose_font_with(
    owner: HWND,
    resolver: &dyn FontFileResolver,
) -> Result<Option<FontSelection>> {
    let mut log_font = LOGFONTW::default();

    let mut cf = CHOOSEFONTW {
        lStructSize: std::mem::size_of::<CHOOSEFONTW>() as u32,
        hwndOwner: owner,
        lpLogFont: &mut log_font,
        Flags: CF_SCREENFONTS | CF_NOVERTFONTS | CF_TTONLY,
        ..Default::default()
    };

    debug!("ChooseFontW");

    // SAFETY: `cf` is fully initialised and `lpLogFont` points at
    // `log_font`, which outlives the call.
    let ok = unsafe { ChooseFontW(&mut cf) };

    if !ok.as_bool() {
        return cancelled_or_failed("ChooseFontW").map(|()| None);
    }

    let face_name = from_wide_nul(&log_font.lfFaceName)?;
    let path = resolver.resolve_font_file(&face_name);
    if path.is_none() {
        info!("no font file registered for {face_name:?}");
    }

    Ok(Some(FontSelection {
        point_size: point_size_from_tenths(cf.iPointSize),
        face_name,
        path,
    }))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Tell a cancel apart from a failure after a dialog returned FALSE.
///
/// Must be called immediately after the dialog function: the extended error
/// is overwritten by the next common-dialog call.
fn cancelled_or_failed(dialog: &'static str) -> Result<()> {
    // SAFETY: CommDlgExtendedError takes no arguments and only reads the
    // thread's last common-dialog status.
    let code = unsafe { CommDlgExtendedError() }.0;
    if code == 0 {
        info!("{dialog} cancelled by user");
        Ok(())
    } else {
        warn!("{dialog} failed with extended error {code:#06x}");
        Err(DialogError::Dialog { dialog, code })
    }
}

/// `None` for an empty string (use the OS default), otherwise the
/// NUL-terminated wide form.
fn optional_wide(s: &str, what: &'static str) -> Result<Option<Vec<u16>>> {
    if s.is_empty() {
        return Ok(None);
    }
    to_wide_checked(s, what).map(Some)
}

/// The dialog's in/out file buffer, pre-filled with `default_name`.
fn file_buffer(default_name: &str, capacity: usize) -> Result<Vec<u16>> {
    if default_name.contains('\0') {
        return Err(DialogError::InteriorNul {
            what: "default file name",
        });
    }

    let mut buf = to_wide(default_name);
    // One slot is reserved for the terminator.
    if buf.len() >= capacity {
        return Err(DialogError::InputTooLong {
            what: "default file name",
            len: buf.len(),
            limit: capacity - 1,
        });
    }
    buf.resize(capacity, 0);
    Ok(buf)
}

fn pcwstr_or_null(wide: Option<&[u16]>) -> PCWSTR {
    wide.map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()))
}
