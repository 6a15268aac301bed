// Keyview Key Events
// Immutable event records delivered by the Event Source

use std::fmt;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Canonical key identifier the Modifier Tracker treats as Shift by default.
pub const SHIFT_KEY_ID: &str = "shift";

/// One occurrence of a down, up or press action.
///
/// Produced by the Event Source and never mutated afterwards. `display_char`
/// is only meaningful for press events, where it carries the produced
/// character (already shift-aware, e.g. `"A"` while Shift is held).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key_id: String,
    pub display_char: Option<String>,
}

impl KeyEvent {
    /// Create an event without a produced character
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            display_char: None,
        }
    }

    /// Create an event carrying the character a key press produced
    pub fn typed(key_id: impl Into<String>, display_char: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            display_char: Some(display_char.into()),
        }
    }

    /// The produced character, falling back to the key id when the
    /// Event Source did not supply one.
    pub fn display_char_or_id(&self) -> &str {
        self.display_char.as_deref().unwrap_or(&self.key_id)
    }
}

/// Which of the three raw feeds an event arrived on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    Down,
    Up,
    Press,
}

/// A key event tagged with the feed it came from.
///
/// Merging the three feeds into a single stream of `InputEvent`s is what
/// gives the core one total order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputEvent {
    pub kind: EventKind,
    pub event: KeyEvent,
}

impl InputEvent {
    pub fn down(key_id: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Down,
            event: KeyEvent::new(key_id),
        }
    }

    pub fn up(key_id: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Up,
            event: KeyEvent::new(key_id),
        }
    }

    pub fn press(key_id: impl Into<String>, display_char: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Press,
            event: KeyEvent::typed(key_id, display_char),
        }
    }

    /// Key identifier of the wrapped event
    pub fn key_id(&self) -> &str {
        &self.event.key_id
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Press => write!(f, "press {} {:?}", self.event.key_id, self.event.display_char_or_id()),
            kind => write!(f, "{} {}", kind, self.event.key_id),
        }
    }
}
