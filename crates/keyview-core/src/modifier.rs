// Keyview Modifier Tracker
// Derives "is Shift held" from the down and up feeds

use smallvec::SmallVec;

use crate::key::{EventKind, InputEvent, SHIFT_KEY_ID};

/// Tracks whether Shift is currently held.
///
/// Down events for a Shift key map to `true`, up events to `false`; every
/// other event is filtered out. The current value starts at `false` and is
/// always readable.
#[derive(Debug, Clone)]
pub struct ModifierTracker {
    shift_keys: SmallVec<[String; 2]>,
    shift_held: bool,
}

impl Default for ModifierTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ModifierTracker {
    /// Tracker recognising the canonical `shift` key id
    pub fn new() -> Self {
        Self::with_shift_keys([SHIFT_KEY_ID])
    }

    /// Tracker recognising a custom set of Shift key ids
    pub fn with_shift_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shift_keys: keys.into_iter().map(Into::into).collect(),
            shift_held: false,
        }
    }

    /// Whether `key_id` denotes Shift
    pub fn is_shift(&self, key_id: &str) -> bool {
        self.shift_keys.iter().any(|k| k == key_id)
    }

    /// Current value
    pub fn shift_held(&self) -> bool {
        self.shift_held
    }

    /// Observe one event from the merged down/up stream.
    ///
    /// Returns the new value when the event is a Shift down or up, even if
    /// the value did not change (a repeated Shift down still emits `true`).
    pub fn observe(&mut self, input: &InputEvent) -> Option<bool> {
        if !self.is_shift(input.key_id()) {
            return None;
        }
        let value = match input.kind {
            EventKind::Down => true,
            EventKind::Up => false,
            EventKind::Press => return None,
        };
        self.shift_held = value;
        Some(value)
    }
}
