//! The YARTBML command-line REPL.
//!
//! A single binary with no subcommands or flags beyond what `clap`
//! synthesizes (`--help`/`--version`) -- §6.3 pins the CLI surface to
//! exactly that. Invoked with no arguments, it starts the REPL: prompt
//! `>> `, reads until EOF or an interrupt, exits 0 on a clean EOF and
//! nonzero on an I/O error. No environment variables are consulted.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use yartbml_repl::ReplSession;

const PROMPT: &str = ">> ";

#[derive(Parser)]
#[command(name = "yartbmlc", version, about = "The YARTBML REPL")]
struct Cli;

fn main() {
    Cli::parse();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run() -> io::Result<()> {
    let mut editor = DefaultEditor::new().map_err(to_io_error)?;
    let session = ReplSession::new();
    let stdout = io::stdout();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let mut out = stdout.lock();
                session.eval_line(&line, &mut out)?;
                out.flush()?;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(to_io_error(e)),
        }
    }
}

fn to_io_error(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
