// Keyview Input Layer - Device Filtering
// Explicit device selection versus keyboard autodetection

/// What the filter needs to know about one enumerated device
#[derive(Debug, Clone, Copy)]
pub struct DeviceCandidate<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub is_keyboard: bool,
    pub is_virtual: bool,
}

/// Which devices to listen to.
///
/// With explicit names or paths a device is used only when one of them
/// matches exactly, virtual or not. An empty filter autodetects: every
/// physical keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    wanted: Vec<String>,
}

impl DeviceFilter {
    pub fn new(wanted: &[String]) -> Self {
        Self {
            wanted: wanted.to_vec(),
        }
    }

    pub fn is_autodetect(&self) -> bool {
        self.wanted.is_empty()
    }

    pub fn accepts(&self, device: &DeviceCandidate<'_>) -> bool {
        if self.is_autodetect() {
            return device.is_keyboard && !device.is_virtual;
        }
        self.wanted
            .iter()
            .any(|w| w == device.path || w == device.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &'static str, path: &'static str) -> DeviceCandidate<'static> {
        DeviceCandidate {
            name,
            path,
            is_keyboard: true,
            is_virtual: false,
        }
    }

    #[test]
    fn test_explicit_path_or_name() {
        let filter = DeviceFilter::new(&["/dev/input/event0".to_string(), "Kinesis".to_string()]);
        assert!(!filter.is_autodetect());
        assert!(filter.accepts(&candidate("Logitech Keyboard", "/dev/input/event0")));
        assert!(filter.accepts(&candidate("Kinesis", "/dev/input/event7")));
        assert!(!filter.accepts(&candidate("Other Device", "/dev/input/event1")));
    }

    #[test]
    fn test_autodetect_keyboards_only() {
        let filter = DeviceFilter::default();
        assert!(filter.is_autodetect());
        assert!(filter.accepts(&candidate("Generic Keyboard", "/dev/input/event0")));

        let mouse = DeviceCandidate {
            is_keyboard: false,
            ..candidate("Generic Mouse", "/dev/input/event1")
        };
        assert!(!filter.accepts(&mouse));
    }

    #[test]
    fn test_virtual_only_when_named() {
        let virt = DeviceCandidate {
            is_virtual: true,
            ..candidate("keyd (virtual) keyboard", "/dev/input/event2")
        };
        assert!(!DeviceFilter::default().accepts(&virt));
        assert!(DeviceFilter::new(&["keyd (virtual) keyboard".to_string()]).accepts(&virt));
    }

    #[test]
    fn test_explicit_match_ignores_keyboard_probe() {
        let remote = DeviceCandidate {
            is_keyboard: false,
            ..candidate("Media Remote", "/dev/input/event9")
        };
        assert!(DeviceFilter::new(&["Media Remote".to_string()]).accepts(&remote));
    }
}
