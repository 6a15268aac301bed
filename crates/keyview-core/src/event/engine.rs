// Keyview Composition Engine
// Single-threaded dispatch from the event bus to snapshot subscribers

use crate::catalog::KeyCatalog;
use crate::event::bus::{EventBus, Feeds};
use crate::key::InputEvent;
use crate::modifier::ModifierTracker;
use crate::output::SnapshotSink;
use crate::state::{EventLog, EventLogAccumulator, Snapshot, StateCombiner};

/// Wires the Event Log Accumulator, the Modifier Tracker and the State
/// Combiner to the event bus.
///
/// Each drained event is shown to the accumulator first and the tracker
/// second. Every component output becomes one snapshot, delivered
/// synchronously to all subscribers before the next event is looked at.
pub struct CompositionEngine {
    bus: EventBus,
    log: EventLogAccumulator,
    modifiers: ModifierTracker,
    combiner: StateCombiner,
    sinks: Vec<Box<dyn SnapshotSink>>,
}

impl CompositionEngine {
    pub fn new(catalog: KeyCatalog) -> Self {
        Self::with_tracker(catalog, ModifierTracker::new())
    }

    /// Engine with a custom Shift recognizer
    pub fn with_tracker(catalog: KeyCatalog, modifiers: ModifierTracker) -> Self {
        let log = EventLogAccumulator::new();
        let combiner = StateCombiner::new(catalog, log.log().clone(), modifiers.shift_held());
        Self {
            bus: EventBus::new(),
            log,
            modifiers,
            combiner,
            sinks: Vec::new(),
        }
    }

    /// Push-side handles for an Event Source
    pub fn feeds(&self) -> Feeds {
        self.bus.feeds()
    }

    /// Register a subscriber. It receives the current snapshot right away,
    /// then every later one.
    pub fn subscribe<S: SnapshotSink + 'static>(&mut self, mut sink: S) {
        sink.deliver(self.combiner.latest());
        self.sinks.push(Box::new(sink));
    }

    /// Enqueue one event and process everything pending.
    ///
    /// Returns the number of snapshots emitted.
    pub fn dispatch(&mut self, input: InputEvent) -> usize {
        self.bus.publish(input);
        self.drain()
    }

    /// Dispatch a sequence of events in order
    pub fn dispatch_all<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for input in inputs {
            self.bus.publish(input);
        }
        self.drain()
    }

    /// Process every queued event in arrival order.
    ///
    /// Returns the number of snapshots emitted.
    pub fn drain(&mut self) -> usize {
        let mut emitted = 0;
        while let Some(input) = self.bus.pop() {
            emitted += self.process(&input);
        }
        emitted
    }

    /// Replace the catalog. Layouts are static at runtime; this exists for
    /// reloading a custom layout.
    pub fn replace_catalog(&mut self, catalog: KeyCatalog) {
        self.combiner.update_catalog(catalog);
        self.deliver();
    }

    /// Swap the Shift recognizer, e.g. after the configured Shift keys
    /// change. The snapshot follows the new tracker's value; one snapshot is
    /// emitted only if that value differs.
    pub fn replace_tracker(&mut self, modifiers: ModifierTracker) {
        self.modifiers = modifiers;
        let shift_held = self.modifiers.shift_held();
        if self.combiner.latest().shift_held != shift_held {
            self.combiner.update_shift(shift_held);
            self.deliver();
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.combiner.latest()
    }

    pub fn log(&self) -> &EventLog {
        self.log.log()
    }

    pub fn shift_held(&self) -> bool {
        self.modifiers.shift_held()
    }

    /// Events sent but not drained yet
    pub fn pending(&self) -> usize {
        self.bus.len()
    }

    fn process(&mut self, input: &InputEvent) -> usize {
        log::trace!("dispatch {}", input);

        let entries = self.log.observe(input).clone();
        self.combiner.update_log(entries);
        self.deliver();
        let mut emitted = 1;

        if let Some(shift_held) = self.modifiers.observe(input) {
            log::debug!("shift held: {}", shift_held);
            self.combiner.update_shift(shift_held);
            self.deliver();
            emitted += 1;
        }

        emitted
    }

    fn deliver(&mut self) {
        let snapshot = self.combiner.latest();
        for sink in &mut self.sinks {
            sink.deliver(snapshot);
        }
    }
}

impl Default for CompositionEngine {
    fn default() -> Self {
        Self::new(KeyCatalog::standard())
    }
}
