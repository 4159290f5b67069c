// ── Dialog requests ───────────────────────────────────────────────────────────
//
// A serializable description of one dialog call and its result.  The demo
// binary reads requests from JSON files; `platform::win32::dispatch` runs
// them.  No `unsafe`; pure safe Rust + serde_json.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    color::{Color, CustomColors},
    error::Result,
    font::FontSelection,
    modal::DialogOption,
};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Parameters shared by the open, save and multi-select file dialogs.
///
/// Every string may be empty, which means "use the OS default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDialogOptions {
    /// `"description|pattern"` entries, e.g. `"Text Files(*.txt)|*.txt"`.
    pub filters: Vec<String>,
    /// Window title; empty uses "Open" / "Save As".
    pub title: String,
    /// Initial directory; empty uses the current directory.
    pub initial_dir: String,
    /// Pre-filled file name.
    pub default_file_name: String,
    /// Extension without the dot, appended when the user types none.
    pub default_ext: String,
}

impl FileDialogOptions {
    /// Options with the given filters and everything else defaulted.
    pub fn with_filters<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filters: filters.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

/// One dialog invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogRequest {
    OpenFile(FileDialogOptions),
    SaveFile(FileDialogOptions),
    OpenFiles(FileDialogOptions),
    Directory {
        #[serde(default)]
        title: String,
        #[serde(default)]
        initial_dir: String,
    },
    Color {
        #[serde(default)]
        initial: Color,
        #[serde(default)]
        custom: CustomColors,
    },
    Font,
    Prompt {
        #[serde(default)]
        title: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        default_content: String,
    },
    MessageBox {
        #[serde(default)]
        title: String,
        #[serde(default)]
        message: String,
        options: Vec<DialogOption>,
    },
    FontPath {
        face_name: String,
    },
}

impl DialogRequest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OpenFile(_) => "open_file",
            Self::SaveFile(_) => "save_file",
            Self::OpenFiles(_) => "open_files",
            Self::Directory { .. } => "directory",
            Self::Color { .. } => "color",
            Self::Font => "font",
            Self::Prompt { .. } => "prompt",
            Self::MessageBox { .. } => "message_box",
            Self::FontPath { .. } => "font_path",
        }
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// Result of one dialog invocation.  Cancellation is a normal response
/// (`None` / empty list / `selected: 0`), never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogResponse {
    Path { path: Option<String> },
    Paths { paths: Vec<String> },
    Color { color: Option<Color>, custom: CustomColors },
    Font { font: Option<FontSelection> },
    Prompt { text: Option<String> },
    MessageBox { selected: i32 },
    FontPath { path: Option<String> },
}

impl DialogResponse {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_request_defaults_missing_fields() {
        let req = DialogRequest::from_json_str(
            r#"{"kind":"open_file","filters":["Text(*.txt)|*.txt"],"title":"Pick"}"#,
        )
        .expect("parse");
        let DialogRequest::OpenFile(opts) = req else {
            panic!("wrong variant");
        };
        assert_eq!(opts.filters, vec!["Text(*.txt)|*.txt".to_owned()]);
        assert_eq!(opts.title, "Pick");
        assert!(opts.initial_dir.is_empty());
        assert!(opts.default_ext.is_empty());
    }

    #[test]
    fn message_box_request_parses_options() {
        let req = DialogRequest::from_json_str(
            r#"{"kind":"message_box","title":"Q","message":"Continue?",
                "options":[{"id":7,"label":"Yes"},{"id":8,"label":"No"}]}"#,
        )
        .expect("parse");
        assert_eq!(req.kind(), "message_box");
        let DialogRequest::MessageBox { options, .. } = req else {
            panic!("wrong variant");
        };
        assert_eq!(options, vec![DialogOption::new(7, "Yes"), DialogOption::new(8, "No")]);
    }

    #[test]
    fn color_request_defaults_to_black() {
        let req = DialogRequest::from_json_str(r#"{"kind":"color"}"#).expect("parse");
        assert_eq!(
            req,
            DialogRequest::Color {
                initial: Color::default(),
                custom: CustomColors::default(),
            }
        );
    }

    #[test]
    fn unknown_kind_is_config_error() {
        let err = DialogRequest::from_json_str(r#"{"kind":"teleport"}"#).unwrap_err();
        assert!(matches!(err, crate::DialogError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DialogRequest::from_path(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, crate::DialogError::Io(_)));
    }

    #[test]
    fn with_filters_builder() {
        let opts = FileDialogOptions::with_filters(["All Files(*.*)|*.*"]);
        assert_eq!(opts.filters.len(), 1);
        assert!(opts.title.is_empty());
    }

    #[test]
    fn cancelled_responses_serialize_as_null() {
        let json = DialogResponse::Path { path: None }.to_json(false).expect("serialize");
        assert_eq!(json, r#"{"kind":"path","path":null}"#);

        let json = DialogResponse::MessageBox { selected: 0 }
            .to_json(false)
            .expect("serialize");
        assert_eq!(json, r#"{"kind":"message_box","selected":0}"#);
    }
}
