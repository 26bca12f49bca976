use std::path::PathBuf;
use std::process;

use clap::Parser;
use kiln::Kiln;
use log::warn;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// A dynamically typed, expression-oriented scripting language.
#[derive(Parser)]
#[command(name = "kiln", version, about)]
struct Cli {
    /// Script to run. Omit to start the REPL.
    script: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.script {
        Some(path) => {
            let mut kiln = Kiln::new();
            kiln.run_file(&path.to_string_lossy());
        }
        None => run_prompt(),
    }
}

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(".kiln_history"))
}

fn run_prompt() {
    let mut kiln = Kiln::new();
    let mut editor = DefaultEditor::new().expect("failed to initialize the line editor");

    let history_path = history_path();
    if let Some(path) = &history_path {
        if editor.load_history(path).is_err() {
            warn!("no previous history file at {}", path.display());
        }
    }

    loop {
        match editor.readline("kiln> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str()).ok();
                kiln.run_line(&line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("kiln: readline error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Err(err) = editor.save_history(path) {
            warn!("could not save history to {}: {err}", path.display());
        }
    }

    process::exit(0);
}
