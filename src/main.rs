// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden in the binary; all FFI lives in the library's
// `platform::win32` module.
#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use commdlg::{
    cli::{CliArgs, Command},
    DialogRequest, Result,
};
use log::error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let request = match args.command {
        Command::Run { file } => DialogRequest::from_path(&file)?,
        command => match command.into_request() {
            Some(request) => request,
            None => return Ok(()),
        },
    };
    show(&request, args.pretty)
}

#[cfg(windows)]
fn show(request: &DialogRequest, pretty: bool) -> Result<()> {
    use windows::Win32::Foundation::HWND;

    let response = commdlg::platform::win32::dispatch::execute(request, HWND::default())?;
    println!("{}", response.to_json(pretty)?);
    Ok(())
}

#[cfg(not(windows))]
fn show(request: &DialogRequest, _pretty: bool) -> Result<()> {
    Err(commdlg::DialogError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("the {} dialog requires Windows", request.kind()),
    )))
}
