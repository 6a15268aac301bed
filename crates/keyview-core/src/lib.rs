// Keyview Core Library
// Event-stream composition for a live keyboard visualizer

pub mod catalog;
pub mod event;
pub mod input;
pub mod key;
pub mod modifier;
pub mod output;
pub mod script;
pub mod settings;
pub mod state;
pub mod view;

pub use catalog::{CatalogError, KeyCatalog, KeyDescriptor};
pub use event::{CompositionEngine, EventBus, EventSender, Feeds};
pub use input::{KeyTranslator, RawKeyEvent};
pub use key::{EventKind, InputEvent, KeyEvent, SHIFT_KEY_ID};
pub use modifier::ModifierTracker;
pub use output::{LatestSnapshot, SnapshotHistory, SnapshotSink};
pub use script::{load_script, parse_script, ScriptError};
pub use settings::{Settings, SettingsError};
pub use state::{EventLog, EventLogAccumulator, Snapshot, StateCombiner};
pub use view::KeyCap;

#[cfg(feature = "evdev-input")]
pub use event::{EventLoop, EventLoopError, EventLoopResult};
