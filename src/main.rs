//! Aesop - a modal terminal text editor
//! Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use aesop::config::Config;
use aesop::editor::Editor;
use aesop::term::Terminal;

struct Args {
    demo: bool,
    path: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut demo = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--demo" => demo = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown flag: {other}\nusage: aesop [--demo] [path]"));
            }
            other => {
                if path.replace(PathBuf::from(other)).is_some() {
                    return Err("usage: aesop [--demo] [path]".to_string());
                }
            }
        }
    }
    Ok(Args { demo, path })
}

fn main() -> ExitCode {
    let _log_guard = aesop::logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut term = match Terminal::acquire() {
        Ok(term) => term,
        Err(e) => {
            eprintln!("aesop: {e}");
            return ExitCode::FAILURE;
        }
    };

    let size = term.size();
    let config = Config::load();
    let mut editor = Editor::new(
        config,
        args.demo,
        std::io::stdout(),
        size.cols as usize,
        size.rows as usize,
    );
    if let Some(path) = &args.path {
        editor.open_path(path);
    }

    tracing::info!(demo = args.demo, "starting");
    let result = editor.run(&mut term);
    drop(editor); // leave the alt screen before termios restore
    drop(term);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("aesop: {e}");
            ExitCode::FAILURE
        }
    }
}
