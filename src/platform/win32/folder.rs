// ── Folder browser ────────────────────────────────────────────────────────────
//
// `SHBrowseForFolderW` has no "initial directory" field; the pre-selection
// is sent from the browse callback once the dialog reports
// BFFM_INITIALIZED.  The callback receives the wide path through `lParam`.

#![allow(unsafe_code)]

use std::ffi::c_void;

use log::{debug, info};
use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::{HWND, LPARAM, MAX_PATH, WPARAM},
        System::Com::{CoInitializeEx, CoTaskMemFree, CoUninitialize, COINIT_APARTMENTTHREADED},
        UI::{
            Shell::{
                Common::ITEMIDLIST, SHBrowseForFolderW, SHGetPathFromIDListW, BFFM_INITIALIZED,
                BFFM_SETSELECTIONW, BIF_NEWDIALOGSTYLE, BIF_RETURNONLYFSDIRS, BROWSEINFOW,
            },
            WindowsAndMessaging::SendMessageW,
        },
    },
};

use crate::{
    encoding::{from_wide_nul, to_wide_checked},
    error::{DialogError, Result},
};

/// Show the shell folder browser.
///
/// `title` is the prompt text shown above the tree (the browser's caption
/// cannot be changed).  A non-empty `initial_dir` is pre-selected.  Returns
/// the chosen file-system directory, or `None` if the user cancelled.
pub fn open_directory_name(title: &str, initial_dir: &str, owner: HWND) -> Result<Option<String>> {
    let title_wide = to_wide_checked(title, "title")?;
    let initial_wide = to_wide_checked(initial_dir, "initial directory")?;
    let mut display_name = [0u16; MAX_PATH as usize];

    let mut bi = BROWSEINFOW {
        hwndOwner: owner,
        pszDisplayName: PWSTR(display_name.as_mut_ptr()),
        ulFlags: BIF_RETURNONLYFSDIRS | BIF_NEWDIALOGSTYLE,
        ..Default::default()
    };
    if !title.is_empty() {
        bi.lpszTitle = PCWSTR(title_wide.as_ptr());
    }
    if !initial_dir.is_empty() {
        bi.lpfn = Some(browse_callback);
        bi.lParam = LPARAM(initial_wide.as_ptr() as isize);
    }

    // The new-style browser hosts COM controls.
    let _com = ComApartment::enter();

    debug!("SHBrowseForFolderW");

    // SAFETY: `bi` is fully initialised; `title_wide`, `initial_wide` and
    // `display_name` outlive the call.  The callback only reads `lParam`
    // while the dialog is open.
    let pidl = unsafe { SHBrowseForFolderW(&bi) };
    if pidl.is_null() {
        info!("SHBrowseForFolderW cancelled by user");
        return Ok(None);
    }
    let pidl = OwnedPidl(pidl);

    let mut path = [0u16; MAX_PATH as usize];
    // SAFETY: `pidl` is a live item ID list returned above; `path` is the
    // MAX_PATH buffer the API requires.
    let ok = unsafe { SHGetPathFromIDListW(pidl.0, &mut path) };
    if !ok.as_bool() {
        return Err(DialogError::Win32 {
            function: "SHGetPathFromIDListW",
            code: 0,
        });
    }

    from_wide_nul(&path).map(Some)
}

// SAFETY: called by the shell on the dialog's thread while
// SHBrowseForFolderW is running; `lpdata` is the `lParam` we set, a pointer
// to a NUL-terminated wide string owned by `open_directory_name`.
unsafe extern "system" fn browse_callback(
    hwnd: HWND,
    msg: u32,
    _lparam: LPARAM,
    lpdata: LPARAM,
) -> i32 {
    if msg == BFFM_INITIALIZED {
        // WPARAM(1): lParam is a path string, not a PIDL.
        SendMessageW(hwnd, BFFM_SETSELECTIONW, WPARAM(1), lpdata);
    }
    0
}

/// An item ID list allocated by the shell, freed with `CoTaskMemFree`.
struct OwnedPidl(*mut ITEMIDLIST);

impl Drop for OwnedPidl {
    fn drop(&mut self) {
        // SAFETY: the pointer came from SHBrowseForFolderW and is freed
        // exactly once.
        unsafe { CoTaskMemFree(Some(self.0 as *const c_void)) };
    }
}

/// COM initialisation for the current thread, undone on drop if this call
/// performed it.
struct ComApartment {
    owned: bool,
}

impl ComApartment {
    fn enter() -> Self {
        // SAFETY: no reserved pointer; S_OK and S_FALSE both require a
        // matching CoUninitialize, RPC_E_CHANGED_MODE does not.
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr.is_err() {
            debug!("CoInitializeEx returned {hr:?}; using the existing apartment");
        }
        Self { owned: hr.is_ok() }
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owned {
            // SAFETY: balances the successful CoInitializeEx in `enter`.
            unsafe { CoUninitialize() };
        }
    }
}
