// Keyview Input Layer
// Device detection, filtering and raw key translation

mod device;
mod filter;
mod translate;

pub use device::{is_keyboard, is_virtual_device, DeviceCapabilities, KEYBOARD_PROBE_CODES};
pub use filter::{DeviceCandidate, DeviceFilter};
pub use translate::{key_id, KeyTranslator, RawKeyEvent, KEY_PRESS, KEY_RELEASE, KEY_REPEAT};
