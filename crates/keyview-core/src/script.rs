// Keyview Replay Scripts
// Line-oriented scripted Event Source
//
//   # comment
//   down shift
//   press a A
//   up shift
//   press space \s
//   press num\s7 7
//
// `press` takes an optional produced character. Tokens escape `\s` (space),
// `\t` (tab) and `\\` (backslash); a token of just `\e` is the empty string.

use std::path::Path;
use std::str::FromStr;

use crate::key::{EventKind, InputEvent, KeyEvent};

/// Errors that can occur when reading a replay script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown event kind '{kind}'")]
    UnknownKind { line: usize, kind: String },

    #[error("line {line}: missing key id")]
    MissingKey { line: usize },

    #[error("line {line}: unexpected trailing input '{rest}'")]
    Trailing { line: usize, rest: String },
}

/// Parse a whole script
pub fn parse_script(content: &str) -> Result<Vec<InputEvent>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        if let Some(event) = parse_line(raw, index + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Read and parse a script file
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<InputEvent>, ScriptError> {
    let content = std::fs::read_to_string(path)?;
    parse_script(&content)
}

/// Render events back into script form
pub fn to_script(events: &[InputEvent]) -> String {
    let mut out = String::new();
    for input in events {
        out.push_str(input.kind.as_ref());
        out.push(' ');
        out.push_str(&escape(&input.event.key_id));
        if let Some(ch) = &input.event.display_char {
            out.push(' ');
            out.push_str(&escape(ch));
        }
        out.push('\n');
    }
    out
}

fn parse_line(raw: &str, line: usize) -> Result<Option<InputEvent>, ScriptError> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut parts = text.split_whitespace();
    let kind_token = parts.next().unwrap_or_default();
    let kind = EventKind::from_str(kind_token).map_err(|_| ScriptError::UnknownKind {
        line,
        kind: kind_token.to_string(),
    })?;
    let key_id = parts.next().ok_or(ScriptError::MissingKey { line })?;

    let display_char = match kind {
        EventKind::Press => parts.next().map(unescape),
        EventKind::Down | EventKind::Up => None,
    };

    let rest: Vec<&str> = parts.collect();
    if !rest.is_empty() {
        return Err(ScriptError::Trailing {
            line,
            rest: rest.join(" "),
        });
    }

    Ok(Some(InputEvent {
        kind,
        event: KeyEvent {
            key_id: unescape(key_id),
            display_char,
        },
    }))
}

const EMPTY_TOKEN: &str = "\\e";

fn unescape(token: &str) -> String {
    if token == EMPTY_TOKEN {
        return String::new();
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // Unknown escapes and a trailing backslash stay literal
        match chars.next() {
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape(token: &str) -> String {
    if token.is_empty() {
        return EMPTY_TOKEN.to_string();
    }
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            ' ' => out.push_str("\\s"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}
