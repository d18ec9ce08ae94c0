//! A minimal line-oriented front end that exercises the editing core
//! without a modal TUI: opens a path, reads commands from stdin, prints the
//! resulting [`Outcome`] for each. The real terminal UI (movement keymaps,
//! hex-grid rendering, the byte inspector) lives outside this crate.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use gex_core::command_line::{self, Command, Outcome};
use gex_core::{ByteSource, EditorBuffer, EditorSettings, FileSource};

fn main() {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("usage: gex <path>");
            std::process::exit(2);
        }
    };

    let source: Box<dyn ByteSource> = Box::new(FileSource::new(&path));
    let mut buffer = EditorBuffer::new(path.to_string_lossy().into_owned(), source);
    let mut settings = EditorSettings::default();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_prompt(&mut stdout, &buffer);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("reading stdin: {e}");
                break;
            }
        };

        let cmd = command_line::parse(&line);
        let outcome = command_line::dispatch(&mut buffer, &mut settings, &cmd);
        report(&cmd, &outcome);

        if outcome == Outcome::Quit {
            break;
        }
        print_prompt(&mut stdout, &buffer);
    }
}

fn print_prompt(out: &mut impl Write, buffer: &EditorBuffer) {
    let dirty = if buffer.is_dirty() { "*" } else { "" };
    let _ = write!(out, "{}{} > ", buffer.name(), dirty);
    let _ = out.flush();
}

fn report(cmd: &Command, outcome: &Outcome) {
    match outcome {
        Outcome::Saved => println!("saved"),
        Outcome::Quit => println!("bye"),
        Outcome::QuitRejectedDirty => {
            println!("unsaved changes — use q! to discard them")
        }
        Outcome::CursorOutOfRange => println!("offset out of range"),
        Outcome::SettingsChanged => println!("ok"),
        Outcome::NoOp => {
            if let Command::Unknown(raw) = cmd {
                println!("unknown command: {raw}");
            }
        }
    }
}
