// Keyview Snapshot Sinks
// Push-based output boundary towards presentation

use std::sync::Arc;

use parking_lot::Mutex;

use crate::state::Snapshot;

/// Receives every snapshot the engine emits, in emission order
pub trait SnapshotSink {
    fn deliver(&mut self, snapshot: &Snapshot);
}

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<Snapshot>,
    fresh: bool,
    dropped: u64,
}

/// Drop-to-latest slot shared between the engine and a renderer.
///
/// Every delivery overwrites the previous snapshot. A renderer that cannot
/// keep up only ever sees the most recent one.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot {
    slot: Arc<Mutex<Slot>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest snapshot if it has not been taken yet
    pub fn take_fresh(&self) -> Option<Snapshot> {
        let mut slot = self.slot.lock();
        if !slot.fresh {
            return None;
        }
        slot.fresh = false;
        slot.snapshot.clone()
    }

    /// The latest snapshot, taken or not
    pub fn get(&self) -> Option<Snapshot> {
        self.slot.lock().snapshot.clone()
    }

    /// Snapshots overwritten before anyone took them
    pub fn dropped(&self) -> u64 {
        self.slot.lock().dropped
    }
}

impl SnapshotSink for LatestSnapshot {
    fn deliver(&mut self, snapshot: &Snapshot) {
        let mut slot = self.slot.lock();
        if slot.fresh {
            slot.dropped += 1;
        }
        slot.snapshot = Some(snapshot.clone());
        slot.fresh = true;
    }
}

/// Records every snapshot; used by replay verification and tests
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    entries: Arc<Mutex<Vec<Snapshot>>>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.entries.lock().clone()
    }

    pub fn last(&self) -> Option<Snapshot> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SnapshotSink for SnapshotHistory {
    fn deliver(&mut self, snapshot: &Snapshot) {
        self.entries.lock().push(snapshot.clone());
    }
}
