use clap::Parser;
use commdlg::cli::{parse_option, parse_rgb, CliArgs, Command};
use commdlg::{Color, DialogOption, DialogRequest};

#[test]
fn parses_open_with_filters() {
    let args = CliArgs::parse_from([
        "prog",
        "open",
        "--filter",
        "Text Files(*.txt)|*.txt",
        "--filter",
        "All Files(*.*)|*.*",
        "--title",
        "Pick one",
        "--ext",
        "txt",
    ]);
    let Some(DialogRequest::OpenFile(opts)) = args.command.into_request() else {
        panic!("expected an open_file request");
    };
    assert_eq!(opts.filters.len(), 2);
    assert_eq!(opts.title, "Pick one");
    assert_eq!(opts.default_ext, "txt");
    assert!(opts.initial_dir.is_empty());
}

#[test]
fn parses_open_many() {
    let args = CliArgs::parse_from(["prog", "open-many", "--dir", "C:\\data"]);
    let Some(DialogRequest::OpenFiles(opts)) = args.command.into_request() else {
        panic!("expected an open_files request");
    };
    assert_eq!(opts.initial_dir, "C:\\data");
    assert!(opts.filters.is_empty());
}

#[test]
fn parses_message_box_options_in_order() {
    let args = CliArgs::parse_from([
        "prog",
        "message-box",
        "Question",
        "Save changes?",
        "--option",
        "7=Yes",
        "--option",
        "8=No",
    ]);
    let Some(DialogRequest::MessageBox { options, title, .. }) = args.command.into_request() else {
        panic!("expected a message_box request");
    };
    assert_eq!(title, "Question");
    assert_eq!(options, vec![DialogOption::new(7, "Yes"), DialogOption::new(8, "No")]);
}

#[test]
fn message_box_without_options_is_allowed() {
    let args = CliArgs::parse_from(["prog", "message-box", "T", "M"]);
    let Some(DialogRequest::MessageBox { options, .. }) = args.command.into_request() else {
        panic!("expected a message_box request");
    };
    assert!(options.is_empty());
}

#[test]
fn parses_color_rgb() {
    let args = CliArgs::parse_from(["prog", "color", "--rgb", "255, 128,0"]);
    let Some(DialogRequest::Color { initial, .. }) = args.command.into_request() else {
        panic!("expected a color request");
    };
    assert_eq!(initial, Color::rgb(255, 128, 0));
}

#[test]
fn color_defaults_to_black() {
    let args = CliArgs::parse_from(["prog", "color"]);
    let Some(DialogRequest::Color { initial, .. }) = args.command.into_request() else {
        panic!("expected a color request");
    };
    assert_eq!(initial, Color::default());
}

#[test]
fn run_takes_a_file_and_has_no_inline_request() {
    let args = CliArgs::parse_from(["prog", "--pretty", "run", "request.json"]);
    assert!(args.pretty);
    assert!(matches!(args.command, Command::Run { ref file } if file.ends_with("request.json")));
    assert!(args.command.into_request().is_none());
}

#[test]
fn prompt_default_content() {
    let args = CliArgs::parse_from(["prog", "prompt", "Name", "Your name:", "--default", "Ada"]);
    assert_eq!(
        args.command.into_request(),
        Some(DialogRequest::Prompt {
            title: "Name".to_owned(),
            message: "Your name:".to_owned(),
            default_content: "Ada".to_owned(),
        })
    );
}

#[test]
fn rejects_malformed_rgb() {
    assert!(parse_rgb("1,2").is_err());
    assert!(parse_rgb("1,2,300").is_err());
    assert!(CliArgs::try_parse_from(["prog", "color", "--rgb", "red"]).is_err());
}

#[test]
fn rejects_malformed_option() {
    assert!(parse_option("Yes").is_err());
    assert!(parse_option("x=Yes").is_err());
    assert_eq!(parse_option("3=Maybe = later").unwrap(), DialogOption::new(3, "Maybe = later"));
}
