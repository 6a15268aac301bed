// Keyview Input Layer - Device Detection
// Decides which evdev devices are keyboards worth listening to

/// Key capabilities reported by a device
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    /// Whether the device supports EV_KEY events
    pub has_ev_key: bool,
    /// Supported EV_KEY codes
    pub supported_keys: Vec<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: Vec<u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys,
        }
    }

    pub fn supports_key(&self, key_code: u16) -> bool {
        self.supported_keys.contains(&key_code)
    }
}

/// Q W E R T Y, SPACE, A, Z
pub const KEYBOARD_PROBE_CODES: &[u16] = &[16, 17, 18, 19, 20, 21, 57, 30, 44];

/// A device is a keyboard when it reports EV_KEY with the whole QWERTY
/// row plus A, Z and SPACE. Mice, power buttons and media remotes fail this.
pub fn is_keyboard(capabilities: &DeviceCapabilities) -> bool {
    capabilities.has_ev_key
        && KEYBOARD_PROBE_CODES
            .iter()
            .all(|code| capabilities.supports_key(*code))
}

/// Virtual devices (created by remappers such as keyd or kmonad) would
/// double every event a physical keyboard already reports.
pub fn is_virtual_device(name: &str, marker: &str) -> bool {
    name.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without(code: u16) -> DeviceCapabilities {
        let keys = KEYBOARD_PROBE_CODES
            .iter()
            .copied()
            .filter(|c| *c != code)
            .collect();
        DeviceCapabilities::new(true, keys)
    }

    #[test]
    fn test_full_keyboard() {
        let mut keys: Vec<u16> = (1..=88).collect();
        keys.extend_from_slice(&[96, 97, 100, 102, 103, 104, 105, 106]);
        assert!(is_keyboard(&DeviceCapabilities::new(true, keys)));
    }

    #[test]
    fn test_probe_codes_are_sufficient() {
        let caps = DeviceCapabilities::new(true, KEYBOARD_PROBE_CODES.to_vec());
        assert!(is_keyboard(&caps));
    }

    #[test]
    fn test_each_probe_code_is_required() {
        for code in KEYBOARD_PROBE_CODES {
            assert!(!is_keyboard(&without(*code)), "code {} missing", code);
        }
    }

    #[test]
    fn test_no_ev_key() {
        let caps = DeviceCapabilities::new(false, KEYBOARD_PROBE_CODES.to_vec());
        assert!(!is_keyboard(&caps));
    }

    #[test]
    fn test_mouse_is_not_keyboard() {
        // BTN_LEFT, BTN_RIGHT, BTN_MIDDLE
        let caps = DeviceCapabilities::new(true, vec![272, 273, 274]);
        assert!(!is_keyboard(&caps));
    }

    #[test]
    fn test_is_virtual_device() {
        assert!(is_virtual_device("keyd (virtual) keyboard", "(virtual)"));
        assert!(!is_virtual_device("Logitech USB Keyboard", "(virtual)"));
    }
}
