// Keyview Output Layer
// Snapshot delivery towards presentation

mod sink;

pub use sink::{LatestSnapshot, SnapshotHistory, SnapshotSink};
