// Keyview View Model
// Stateless mapping from a snapshot to drawable key caps

use crate::catalog::KeyDescriptor;
use crate::state::Snapshot;

/// One key as it should be drawn for a given snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCap<'a> {
    /// Rendering identity (alternate id, else base id)
    pub identity: &'a str,
    /// Text on the cap
    pub label: &'a str,
    /// Shift is held while drawing
    pub shifted: bool,
}

impl<'a> KeyCap<'a> {
    pub fn new(key: &'a KeyDescriptor, shifted: bool) -> Self {
        Self {
            identity: key.identity(),
            label: key.label(shifted),
            shifted,
        }
    }
}

/// Key caps in layout order
pub fn key_caps(snapshot: &Snapshot) -> Vec<KeyCap<'_>> {
    snapshot
        .keys()
        .iter()
        .map(|k| KeyCap::new(k, snapshot.shift_held))
        .collect()
}

/// Key caps grouped by physical row
pub fn key_rows(snapshot: &Snapshot) -> Vec<Vec<KeyCap<'_>>> {
    snapshot
        .keys
        .rows()
        .map(|row| {
            row.iter()
                .map(|k| KeyCap::new(k, snapshot.shift_held))
                .collect()
        })
        .collect()
}

/// The newest `limit` log entries, oldest first
pub fn recent_log(snapshot: &Snapshot, limit: usize) -> &[String] {
    let log = snapshot.log();
    &log[log.len().saturating_sub(limit)..]
}
