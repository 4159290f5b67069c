// ── Fonts ─────────────────────────────────────────────────────────────────────
//
// The font picker only reports a face name; mapping it to a file on disk is a
// best-effort lookup over the font registrations the OS keeps.  The lookup is
// expressed against the narrow `FontSource` capability so the registry stays
// confined to `platform::win32::registry`.

use serde::Serialize;

/// What the font picker returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontSelection {
    /// Face name, e.g. `Segoe UI`.
    pub face_name: String,
    /// Probable font file.  `None` means no registration matched; that is
    /// a normal outcome, not an error.
    pub path: Option<String>,
    /// Size in whole points.
    pub point_size: i32,
}

/// Convert `CHOOSEFONTW::iPointSize` (tenths of a point) to whole points,
/// truncating.
pub const fn point_size_from_tenths(tenths: i32) -> i32 {
    tenths / 10
}

// ── Font registrations ────────────────────────────────────────────────────────

/// Which registration list to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontScope {
    /// Fonts installed for all users.
    Machine,
    /// Fonts installed for the current user only.
    User,
}

/// One registered font: value name (e.g. `Arial (TrueType)`) and file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub name: String,
    pub path: String,
}

impl FontEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A backing store of font registrations.
pub trait FontSource {
    /// String-valued registrations in `scope`, in provider order.  An
    /// unreadable location yields an empty list.
    fn entries(&self, scope: FontScope) -> Vec<FontEntry>;

    /// Directory that relative registrations are relative to.
    fn fonts_dir(&self) -> String;
}

/// Resolve a font face name to a file path.
pub trait FontFileResolver {
    /// `None` when nothing matches.
    fn resolve_font_file(&self, face_name: &str) -> Option<String>;
}

impl<S: FontSource> FontFileResolver for S {
    fn resolve_font_file(&self, face_name: &str) -> Option<String> {
        // Machine-wide registrations are searched first; the user list is
        // only consulted after a full miss.
        [FontScope::Machine, FontScope::User]
            .into_iter()
            .find_map(|scope| find_in_scope(self, scope, face_name))
    }
}

fn find_in_scope<S: FontSource + ?Sized>(
    source: &S,
    scope: FontScope,
    face_name: &str,
) -> Option<String> {
    let query = face_name.to_lowercase();
    let entry = source
        .entries(scope)
        .into_iter()
        .find(|entry| display_name(&entry.name).to_lowercase().contains(&query))?;

    log::debug!("font {face_name:?} matched {:?} in {scope:?}", entry.name);
    Some(absolute_font_path(&entry.path, &source.fonts_dir()))
}

/// `Arial Bold (TrueType)` → `Arial Bold`.
fn display_name(value_name: &str) -> &str {
    value_name
        .find(" (")
        .map_or(value_name, |pos| &value_name[..pos])
}

/// Registrations without a drive component live in the system font dir.
fn absolute_font_path(path: &str, fonts_dir: &str) -> String {
    if path.contains(':') {
        path.to_owned()
    } else {
        format!("{}\\{path}", fonts_dir.trim_end_matches('\\'))
    }
}

// ── In-memory source ──────────────────────────────────────────────────────────

/// A fixed table of registrations; used by tests and on hosts without a
/// font registry.
#[derive(Debug, Clone, Default)]
pub struct StaticFontSource {
    pub machine: Vec<FontEntry>,
    pub user: Vec<FontEntry>,
    pub fonts_dir: String,
}

impl FontSource for StaticFontSource {
    fn entries(&self, scope: FontScope) -> Vec<FontEntry> {
        match scope {
            FontScope::Machine => self.machine.clone(),
            FontScope::User => self.user.clone(),
        }
    }

    fn fonts_dir(&self) -> String {
        self.fonts_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StaticFontSource {
        StaticFontSource {
            machine: vec![
                FontEntry::new("Arial (TrueType)", "arial.ttf"),
                FontEntry::new("Arial Bold (TrueType)", "arialbd.ttf"),
                FontEntry::new("Segoe UI (TrueType)", "segoeui.ttf"),
            ],
            user: vec![
                FontEntry::new(
                    "Fira Code (TrueType)",
                    "C:\\Users\\me\\AppData\\Local\\Microsoft\\Windows\\Fonts\\FiraCode.ttf",
                ),
                FontEntry::new("Segoe UI (TrueType)", "C:\\user\\segoeui.ttf"),
            ],
            fonts_dir: "C:\\Windows\\Fonts".to_owned(),
        }
    }

    #[test]
    fn point_size_truncates() {
        assert_eq!(point_size_from_tenths(125), 12);
        assert_eq!(point_size_from_tenths(119), 11);
        assert_eq!(point_size_from_tenths(120), 12);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(
            source().resolve_font_file("SEGOE ui").as_deref(),
            Some("C:\\Windows\\Fonts\\segoeui.ttf")
        );
    }

    #[test]
    fn parenthetical_suffix_is_ignored() {
        // "truetype" only appears inside the stripped suffix.
        assert_eq!(source().resolve_font_file("TrueType"), None);
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            source().resolve_font_file("arial").as_deref(),
            Some("C:\\Windows\\Fonts\\arial.ttf")
        );
    }

    #[test]
    fn machine_scope_wins_over_user() {
        let path = source().resolve_font_file("Segoe UI").unwrap();
        assert!(path.starts_with("C:\\Windows\\Fonts"));
    }

    #[test]
    fn falls_back_to_user_scope_with_absolute_path() {
        assert_eq!(
            source().resolve_font_file("fira").as_deref(),
            Some("C:\\Users\\me\\AppData\\Local\\Microsoft\\Windows\\Fonts\\FiraCode.ttf")
        );
    }

    #[test]
    fn no_match_is_none_not_error() {
        assert_eq!(source().resolve_font_file("Comic Sans"), None);
        assert_eq!(StaticFontSource::default().resolve_font_file("Arial"), None);
    }

    #[test]
    fn trailing_backslash_in_fonts_dir_is_not_doubled() {
        let mut s = source();
        s.fonts_dir = "D:\\Fonts\\".to_owned();
        assert_eq!(
            s.resolve_font_file("bold").as_deref(),
            Some("D:\\Fonts\\arialbd.ttf")
        );
    }

    #[test]
    fn selection_serializes_missing_path_as_null() {
        let sel = FontSelection {
            face_name: "Nowhere".to_owned(),
            path: None,
            point_size: 9,
        };
        let json = serde_json::to_string(&sel).expect("serialize");
        assert_eq!(json, r#"{"face_name":"Nowhere","path":null,"point_size":9}"#);
    }
}
