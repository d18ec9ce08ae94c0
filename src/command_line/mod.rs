//! Parses the fixed command grammar the surrounding UI sends to the core
//! (spec §6) into a typed [`Command`], and dispatches it against an
//! [`EditorBuffer`] plus [`EditorSettings`].

use crate::buffer::EditorBuffer;
use crate::settings::{ByteOrder, EditorSettings};

/// A parsed command-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    QuitForce,
    Write,
    WriteQuit,
    Goto(u64),
    SetCols(usize),
    SetInspectorEnabled(bool),
    SetInspectorByteOrder(ByteOrder),
    /// Anything that doesn't match the grammar, carried along verbatim so
    /// the caller can report it.
    Unknown(String),
}

/// What happened after dispatching a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    Quit,
    /// A plain `:q` was rejected because the buffer has unsaved edits.
    QuitRejectedDirty,
    CursorOutOfRange,
    SettingsChanged,
    NoOp,
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_hex_offset(token: &str) -> Option<u64> {
    let token = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(token, 16).ok()
}

/// Parses a trimmed input line against the grammar in spec §6.
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    match line {
        "q" | "quit" => return Command::Quit,
        "q!" | "quit!" => return Command::QuitForce,
        "w" | "write" => return Command::Write,
        "wq" => return Command::WriteQuit,
        _ => {}
    }

    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("goto") => parts
            .next()
            .and_then(parse_hex_offset)
            .map(Command::Goto)
            .unwrap_or_else(|| Command::Unknown(line.to_string())),
        Some("set") => parse_set(&mut parts).unwrap_or_else(|| Command::Unknown(line.to_string())),
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_set<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<Command> {
    match parts.next()? {
        "cols" => parts.next()?.parse::<usize>().ok().map(Command::SetCols),
        "inspector.enabled" => parts
            .next()
            .and_then(parse_bool)
            .map(Command::SetInspectorEnabled),
        "inspector.byteOrder" => parts
            .next()
            .and_then(ByteOrder::parse)
            .map(Command::SetInspectorByteOrder),
        _ => None,
    }
}

/// Applies a parsed [`Command`] to a buffer and its settings, returning the
/// [`Outcome`] the (absent) UI should react to.
pub fn dispatch(buffer: &mut EditorBuffer, settings: &mut EditorSettings, cmd: &Command) -> Outcome {
    match cmd {
        Command::Quit => {
            if buffer.is_dirty() {
                Outcome::QuitRejectedDirty
            } else {
                Outcome::Quit
            }
        }
        Command::QuitForce => Outcome::Quit,
        Command::Write => match buffer.save(None) {
            Ok(_) => Outcome::Saved,
            Err(_) => Outcome::NoOp,
        },
        Command::WriteQuit => match buffer.save(None) {
            Ok(_) => Outcome::Quit,
            Err(_) => Outcome::NoOp,
        },
        Command::Goto(offset) => match buffer.set_cursor(*offset) {
            Ok(()) => Outcome::NoOp,
            Err(_) => Outcome::CursorOutOfRange,
        },
        Command::SetCols(n) => {
            settings.cols = *n;
            Outcome::SettingsChanged
        }
        Command::SetInspectorEnabled(enabled) => {
            settings.inspector_enabled = *enabled;
            Outcome::SettingsChanged
        }
        Command::SetInspectorByteOrder(order) => {
            settings.inspector_byte_order = *order;
            Outcome::SettingsChanged
        }
        Command::Unknown(_) => Outcome::NoOp,
    }
}
