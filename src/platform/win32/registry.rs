// ── Font registrations ────────────────────────────────────────────────────────
//
// Reads the per-machine and per-user font lists under
// `SOFTWARE\Microsoft\Windows NT\CurrentVersion\Fonts`.  Value names are
// display names such as "Arial (TrueType)"; string data is the font file,
// either bare ("arial.ttf", relative to %WINDIR%\Fonts) or absolute.

#![allow(unsafe_code)]

use log::warn;
use windows::Win32::System::SystemInformation::GetWindowsDirectoryW;
use winreg::{
    enums::{RegType, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ},
    types::FromRegValue,
    RegKey,
};

use crate::{
    encoding::from_wide,
    font::{FontEntry, FontScope, FontSource},
};

const FONTS_KEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion\Fonts";

/// Used when the Windows directory cannot be queried.
const FALLBACK_WINDOWS_DIR: &str = r"C:\Windows";

/// The system font registry, backed by `winreg`.
#[derive(Debug, Clone)]
pub struct RegistryFonts {
    fonts_dir: String,
}

impl RegistryFonts {
    pub fn new() -> Self {
        Self {
            fonts_dir: format!("{}\\Fonts", windows_dir()),
        }
    }
}

impl Default for RegistryFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSource for RegistryFonts {
    fn entries(&self, scope: FontScope) -> Vec<FontEntry> {
        let root = match scope {
            FontScope::Machine => HKEY_LOCAL_MACHINE,
            FontScope::User => HKEY_CURRENT_USER,
        };

        let key = match RegKey::predef(root).open_subkey_with_flags(FONTS_KEY, KEY_READ) {
            Ok(key) => key,
            Err(e) => {
                warn!("cannot open {scope:?} font registrations: {e}");
                return Vec::new();
            }
        };

        // Enumeration stops at the first value that cannot be read.
        key.enum_values()
            .map_while(Result::ok)
            .filter(|(_, value)| matches!(value.vtype, RegType::REG_SZ))
            .filter_map(|(name, value)| {
                String::from_reg_value(&value)
                    .ok()
                    .map(|path| FontEntry { name, path })
            })
            .collect()
    }

    fn fonts_dir(&self) -> String {
        self.fonts_dir.clone()
    }
}

fn windows_dir() -> String {
    let mut buf = [0u16; 260];
    // SAFETY: `buf` is a valid writable buffer; the API writes at most
    // `buf.len()` WCHARs and returns the length written (0 on failure, or
    // the required size if the buffer is too small).
    let len = unsafe { GetWindowsDirectoryW(Some(&mut buf)) } as usize;

    if len == 0 || len >= buf.len() {
        warn!("GetWindowsDirectoryW failed; assuming {FALLBACK_WINDOWS_DIR}");
        return FALLBACK_WINDOWS_DIR.to_owned();
    }
    from_wide(&buf[..len]).unwrap_or_else(|_| FALLBACK_WINDOWS_DIR.to_owned())
}
