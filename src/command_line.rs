//! `:` command-line parsing
//!
//! The recognized command set is deliberately small: quit, write,
//! write-quit, and edit. Everything else reports as unknown.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// Empty line: nothing to do
    Nothing,
    Quit { force: bool },
    Write { path: Option<PathBuf> },
    WriteQuit { path: Option<PathBuf> },
    Edit { path: PathBuf },
    Unknown(String),
}

pub fn parse(input: &str) -> ExCommand {
    let input = input.trim();
    if input.is_empty() {
        return ExCommand::Nothing;
    }
    let mut parts = input.split_whitespace();
    let head = parts.next().expect("nonempty input");
    let arg = parts.next();
    if parts.next().is_some() {
        return ExCommand::Unknown(input.to_string());
    }

    match (head, arg) {
        ("q", None) => ExCommand::Quit { force: false },
        ("q!", None) => ExCommand::Quit { force: true },
        ("w", path) => ExCommand::Write {
            path: path.map(PathBuf::from),
        },
        ("wq", path) => ExCommand::WriteQuit {
            path: path.map(PathBuf::from),
        },
        ("e", Some(path)) => ExCommand::Edit {
            path: PathBuf::from(path),
        },
        _ => ExCommand::Unknown(input.to_string()),
    }
}
