use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    color::{Color, CustomColors},
    modal::DialogOption,
    request::{DialogRequest, FileDialogOptions},
};

/// Show a native dialog and print its result as JSON.
#[derive(Parser, Debug)]
#[command(name = "commdlg-demo", version, about)]
pub struct CliArgs {
    /// Pretty-print the JSON result.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a JSON request file.
    Run { file: PathBuf },
    /// Pick an existing file.
    Open(FileArgs),
    /// Pick a save location.
    Save(FileArgs),
    /// Pick several existing files.
    OpenMany(FileArgs),
    /// Pick a directory.
    Dir {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long = "dir", default_value = "")]
        initial_dir: String,
    },
    /// Pick a color.
    Color {
        /// Initial color as `r,g,b`.
        #[arg(long, value_parser = parse_rgb, default_value = "0,0,0")]
        rgb: Color,
    },
    /// Pick a font.
    Font,
    /// Look up the file of an installed font.
    FontPath { face_name: String },
    /// Ask for a line of text.
    Prompt {
        title: String,
        message: String,
        #[arg(long = "default", default_value = "")]
        default_content: String,
    },
    /// Ask the user to pick one of several buttons.
    MessageBox {
        title: String,
        message: String,
        /// Button as `id=label`; repeatable.
        #[arg(long = "option", value_parser = parse_option)]
        options: Vec<DialogOption>,
    },
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// Filter as `description|pattern`; repeatable.
    #[arg(long = "filter")]
    pub filters: Vec<String>,
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long = "dir", default_value = "")]
    pub initial_dir: String,
    #[arg(long = "name", default_value = "")]
    pub default_file_name: String,
    #[arg(long = "ext", default_value = "")]
    pub default_ext: String,
}

impl From<FileArgs> for FileDialogOptions {
    fn from(args: FileArgs) -> Self {
        Self {
            filters: args.filters,
            title: args.title,
            initial_dir: args.initial_dir,
            default_file_name: args.default_file_name,
            default_ext: args.default_ext,
        }
    }
}

impl Command {
    /// The request this command describes, or `None` for `run`, whose
    /// request lives in a file.
    pub fn into_request(self) -> Option<DialogRequest> {
        let request = match self {
            Self::Run { .. } => return None,
            Self::Open(args) => DialogRequest::OpenFile(args.into()),
            Self::Save(args) => DialogRequest::SaveFile(args.into()),
            Self::OpenMany(args) => DialogRequest::OpenFiles(args.into()),
            Self::Dir { title, initial_dir } => DialogRequest::Directory { title, initial_dir },
            Self::Color { rgb } => DialogRequest::Color {
                initial: rgb,
                custom: CustomColors::default(),
            },
            Self::Font => DialogRequest::Font,
            Self::FontPath { face_name } => DialogRequest::FontPath { face_name },
            Self::Prompt {
                title,
                message,
                default_content,
            } => DialogRequest::Prompt {
                title,
                message,
                default_content,
            },
            Self::MessageBox {
                title,
                message,
                options,
            } => DialogRequest::MessageBox {
                title,
                message,
                options,
            },
        };
        Some(request)
    }
}

/// `"255,128,0"` → opaque color.
pub fn parse_rgb(s: &str) -> Result<Color, String> {
    let channels = s
        .split(',')
        .map(|c| c.trim().parse::<u8>().map_err(|e| format!("bad channel {c:?}: {e}")))
        .collect::<Result<Vec<u8>, String>>()?;

    match channels[..] {
        [r, g, b] => Ok(Color::rgb(r, g, b)),
        _ => Err(format!("expected r,g,b, got {s:?}")),
    }
}

/// `"7=Yes"` → option 7 labelled "Yes".
pub fn parse_option(s: &str) -> Result<DialogOption, String> {
    let (id, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected id=label, got {s:?}"))?;
    let id = id
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad option id {id:?}: {e}"))?;
    Ok(DialogOption::new(id, label))
}
