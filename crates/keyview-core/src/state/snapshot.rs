// Keyview State Combiner
// Joins log, catalog and Shift state into immutable snapshots

use crate::catalog::{KeyCatalog, KeyDescriptor};
use crate::state::event_log::EventLog;

/// Fully joined view of the current derived state.
///
/// Snapshots are values: building a new one never touches an older one, so
/// a presentation layer may hold any number of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Emission counter, starting at 0 for the initial snapshot
    pub sequence: u64,
    pub log: EventLog,
    pub keys: KeyCatalog,
    pub shift_held: bool,
}

impl Snapshot {
    pub fn keys(&self) -> &[KeyDescriptor] {
        self.keys.keys()
    }

    pub fn log(&self) -> &[String] {
        self.log.entries()
    }
}

/// Combine-latest over the three inputs.
///
/// Any update produces exactly one new snapshot built from the latest value
/// of every input. There is no deduplication.
#[derive(Debug, Clone)]
pub struct StateCombiner {
    latest: Snapshot,
}

impl StateCombiner {
    /// The catalog is injected once; log and Shift start from their seeds.
    pub fn new(catalog: KeyCatalog, log: EventLog, shift_held: bool) -> Self {
        Self {
            latest: Snapshot {
                sequence: 0,
                log,
                keys: catalog,
                shift_held,
            },
        }
    }

    /// Most recently emitted snapshot
    pub fn latest(&self) -> &Snapshot {
        &self.latest
    }

    pub fn update_log(&mut self, log: EventLog) -> &Snapshot {
        self.emit(|s| s.log = log)
    }

    pub fn update_shift(&mut self, shift_held: bool) -> &Snapshot {
        self.emit(|s| s.shift_held = shift_held)
    }

    pub fn update_catalog(&mut self, catalog: KeyCatalog) -> &Snapshot {
        self.emit(|s| s.keys = catalog)
    }

    fn emit(&mut self, apply: impl FnOnce(&mut Snapshot)) -> &Snapshot {
        let mut next = self.latest.clone();
        next.sequence += 1;
        apply(&mut next);
        self.latest = next;
        &self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::InputEvent;
    use crate::state::event_log::EventLogAccumulator;

    fn combiner() -> StateCombiner {
        StateCombiner::new(KeyCatalog::standard(), EventLog::new(), false)
    }

    #[test]
    fn test_initial_snapshot() {
        let c = combiner();
        let s = c.latest();
        assert_eq!(s.sequence, 0);
        assert!(s.log().is_empty());
        assert!(!s.shift_held);
        assert_eq!(s.keys().len(), 103);
    }

    #[test]
    fn test_shift_update_keeps_latest_log() {
        let mut acc = EventLogAccumulator::new();
        let mut c = combiner();
        c.update_log(acc.observe(&InputEvent::down("a")).clone());
        let s = c.update_shift(true).clone();
        assert!(s.shift_held);
        assert_eq!(s.log(), acc.log().entries());
        assert_eq!(s.sequence, 2);
    }

    #[test]
    fn test_log_update_keeps_latest_shift() {
        let mut acc = EventLogAccumulator::new();
        let mut c = combiner();
        c.update_shift(true);
        let s = c.update_log(acc.observe(&InputEvent::press("a", "A")).clone());
        assert!(s.shift_held);
        assert_eq!(s.log(), &["A is typed"]);
    }

    #[test]
    fn test_catalog_update_keeps_other_fields() {
        let mut acc = EventLogAccumulator::new();
        let mut c = combiner();
        c.update_log(acc.observe(&InputEvent::down("x")).clone());
        c.update_shift(true);

        let small = KeyCatalog::from_toml("[[row]]\nkeys = [{ name = \"x\" }]").unwrap();
        let s = c.update_catalog(small.clone());
        assert_eq!(s.keys, small);
        assert!(s.shift_held);
        assert_eq!(s.log(), acc.log().entries());
    }

    #[test]
    fn test_identical_updates_still_emit() {
        let mut c = combiner();
        c.update_shift(false);
        c.update_shift(false);
        assert_eq!(c.latest().sequence, 2);
    }

    #[test]
    fn test_previous_snapshot_unchanged() {
        let mut acc = EventLogAccumulator::new();
        let mut c = combiner();
        let before = c.latest().clone();
        c.update_log(acc.observe(&InputEvent::down("a")).clone());
        assert!(before.log().is_empty());
        assert_eq!(before.sequence, 0);
    }
}
