// Keyview Derived State
// Event log fold and snapshot combination

pub mod event_log;
pub mod snapshot;

pub use self::event_log::{describe, EventLog, EventLogAccumulator, LogMessage};
pub use self::snapshot::{Snapshot, StateCombiner};
