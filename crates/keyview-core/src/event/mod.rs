// Keyview Event Handling
// Event bus, composition engine and the evdev Event Source

pub mod bus;
pub mod engine;
#[cfg(feature = "evdev-input")]
pub mod r#loop;

pub use bus::{EventBus, EventSender, Feeds};
pub use engine::CompositionEngine;
#[cfg(feature = "evdev-input")]
pub use r#loop::{DeviceInfo, EventLoop, EventLoopError, EventLoopResult};
