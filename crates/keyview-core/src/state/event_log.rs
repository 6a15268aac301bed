// Keyview Event Log
// Folds the merged down/up/press stream into an ordered description log

use std::ops::Deref;
use std::sync::Arc;

use crate::key::{EventKind, InputEvent};

/// Ordered, append-only sequence of event descriptions.
///
/// Cloning is cheap: clones share storage until the owning accumulator
/// appends while a snapshot still holds the previous value.
///
/// The log is unbounded for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Arc<Vec<String>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    fn append(&mut self, entry: String) {
        Arc::make_mut(&mut self.entries).push(entry);
    }
}

impl Deref for EventLog {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.entries
    }
}

/// One item of the fold's input.
///
/// `Start` seeds the fold exactly once so a log exists before the first
/// real event; it never appends anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMessage {
    Start,
    Described(String),
}

/// Human-readable description of an event
pub fn describe(input: &InputEvent) -> String {
    match input.kind {
        EventKind::Down => format!("{} key is down", input.event.key_id),
        EventKind::Up => format!("{} key is up", input.event.key_id),
        EventKind::Press => format!("{} is typed", input.event.display_char_or_id()),
    }
}

/// One fold step
pub fn fold(mut log: EventLog, message: LogMessage) -> EventLog {
    if let LogMessage::Described(entry) = message {
        log.append(entry);
    }
    log
}

/// Owns the `EventLog` and is the only thing that ever replaces it
#[derive(Debug, Clone)]
pub struct EventLogAccumulator {
    log: EventLog,
}

impl Default for EventLogAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLogAccumulator {
    /// Seed the fold with the start marker
    pub fn new() -> Self {
        Self {
            log: fold(EventLog::new(), LogMessage::Start),
        }
    }

    /// Current log value
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Append the description of `input`; every down, up and press
    /// qualifies.
    pub fn observe(&mut self, input: &InputEvent) -> &EventLog {
        let log = std::mem::take(&mut self.log);
        self.log = fold(log, LogMessage::Described(describe(input)));
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_formats() {
        assert_eq!(describe(&InputEvent::down("shift")), "shift key is down");
        assert_eq!(describe(&InputEvent::up("shift")), "shift key is up");
        assert_eq!(describe(&InputEvent::press("a", "A")), "A is typed");
    }

    #[test]
    fn test_describe_press_without_char_uses_key_id() {
        let input = InputEvent {
            kind: EventKind::Press,
            event: crate::key::KeyEvent::new("enter"),
        };
        assert_eq!(describe(&input), "enter is typed");
    }

    #[test]
    fn test_start_marker_appends_nothing() {
        let log = fold(EventLog::new(), LogMessage::Start);
        assert!(log.is_empty());
        let acc = EventLogAccumulator::new();
        assert!(acc.log().is_empty());
    }

    #[test]
    fn test_observe_appends_in_order() {
        let mut acc = EventLogAccumulator::new();
        acc.observe(&InputEvent::down("a"));
        acc.observe(&InputEvent::press("a", "a"));
        acc.observe(&InputEvent::up("a"));
        assert_eq!(
            acc.log().entries(),
            &["a key is down", "a is typed", "a key is up"]
        );
        assert_eq!(acc.log().last(), Some("a key is up"));
    }

    #[test]
    fn test_held_clone_is_not_mutated() {
        let mut acc = EventLogAccumulator::new();
        acc.observe(&InputEvent::down("a"));
        let held = acc.log().clone();
        acc.observe(&InputEvent::up("a"));
        assert_eq!(held.len(), 1);
        assert_eq!(acc.log().len(), 2);
    }
}
