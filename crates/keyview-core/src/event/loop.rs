// Keyview evdev Event Source
// Passive keyboard device polling for the visualizer

use std::os::unix::io::AsRawFd;
use std::path::PathBuf;

use evdev::{Device, EventType, Key};

use crate::input::{
    is_keyboard, is_virtual_device, DeviceCandidate, DeviceCapabilities, DeviceFilter,
    RawKeyEvent, KEYBOARD_PROBE_CODES,
};

/// Virtual devices created by remappers are skipped during autodetect
const VIRTUAL_MARKER: &str = "(virtual)";

pub type EventLoopResult<T> = Result<T, EventLoopError>;

#[derive(Debug, thiserror::Error)]
pub enum EventLoopError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("All devices disconnected")]
    Exhausted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A keyboard as shown by `--list-devices`
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: Option<String>,
}

/// Polls keyboard devices for key events.
///
/// Devices are never grabbed: the visualizer only listens, every other
/// application keeps receiving the same input.
pub struct EventLoop {
    devices: Vec<Device>,
    poll_fds: Vec<libc::pollfd>,
}

fn device_name(device: &Device) -> &str {
    device.name().unwrap_or("Unknown")
}

/// Probe the handful of codes `is_keyboard` needs
fn probe_keyboard(device: &Device) -> bool {
    let has_ev_key = device.supported_events().contains(EventType::KEY);
    let supported = match device.supported_keys() {
        Some(keys) => KEYBOARD_PROBE_CODES
            .iter()
            .copied()
            .filter(|code| keys.contains(Key::new(*code)))
            .collect(),
        None => Vec::new(),
    };
    is_keyboard(&DeviceCapabilities::new(has_ev_key, supported))
}

/// What poll(2) reported for one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Idle,
    Readable,
    /// Hung up, errored or closed: the device is gone
    Gone,
}

fn readiness(revents: libc::c_short) -> Readiness {
    if revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0 {
        Readiness::Gone
    } else if revents & libc::POLLIN != 0 {
        Readiness::Readable
    } else {
        Readiness::Idle
    }
}

/// Read errors that mean the device was unplugged
fn is_disconnect(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENODEV)
}

/// Remove the entries at `indices` (ascending), returning them in order
fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) -> Vec<T> {
    let mut removed: Vec<T> = indices.iter().rev().map(|&i| items.remove(i)).collect();
    removed.reverse();
    removed
}

/// Enumerated devices the filter accepts, in enumeration order
fn select_devices(filter: &DeviceFilter) -> Vec<(PathBuf, Device)> {
    evdev::enumerate()
        .filter(|(path, device)| {
            let name = device_name(device);
            let candidate = DeviceCandidate {
                name,
                path: path.to_str().unwrap_or_default(),
                is_keyboard: probe_keyboard(device),
                is_virtual: is_virtual_device(name, VIRTUAL_MARKER),
            };
            let accepted = filter.accepts(&candidate);
            if !accepted {
                log::debug!("skipping {} ({})", name, path.display());
            }
            accepted
        })
        .collect()
}

impl EventLoop {
    /// Open every autodetected keyboard
    pub fn new() -> EventLoopResult<Self> {
        Self::new_filtered(&[])
    }

    /// Open the devices matching the given names or paths, or every
    /// keyboard when none are given
    pub fn new_filtered(filter_names: &[String]) -> EventLoopResult<Self> {
        let filter = DeviceFilter::new(filter_names);
        let devices: Vec<Device> = select_devices(&filter)
            .into_iter()
            .map(|(path, device)| {
                log::info!("listening on {} ({})", device_name(&device), path.display());
                device
            })
            .collect();

        if devices.is_empty() {
            let wanted = if filter.is_autodetect() {
                "no keyboard devices found".to_string()
            } else {
                format!("no device matches {}", filter_names.join(", "))
            };
            return Err(EventLoopError::DeviceNotFound(wanted));
        }

        let poll_fds = devices
            .iter()
            .map(|d| libc::pollfd {
                fd: d.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();
        Ok(Self { devices, poll_fds })
    }

    /// Every autodetectable keyboard
    pub fn list_devices() -> EventLoopResult<Vec<DeviceInfo>> {
        let infos: Vec<DeviceInfo> = select_devices(&DeviceFilter::default())
            .into_iter()
            .enumerate()
            .map(|(index, (path, device))| DeviceInfo {
                index,
                name: device_name(&device).to_string(),
                path: path.to_str().map(str::to_string),
            })
            .collect();

        if infos.is_empty() {
            return Err(EventLoopError::DeviceNotFound(
                "no keyboard devices found".to_string(),
            ));
        }
        Ok(infos)
    }

    /// Wait up to `timeout_ms` (poll(2) semantics) and collect key events
    /// from every ready device. Timeouts and EINTR yield an empty vector.
    ///
    /// Unplugged devices are dropped. Once the last one goes this returns
    /// `EventLoopError::Exhausted`.
    pub fn poll_key_events(&mut self, timeout_ms: i32) -> EventLoopResult<Vec<RawKeyEvent>> {
        let mut events = Vec::new();

        // SAFETY: poll_fds is a live, correctly sized array of pollfd
        let ready = unsafe {
            libc::poll(
                self.poll_fds.as_mut_ptr(),
                self.poll_fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };

        if ready < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(events);
            }
            return Err(err.into());
        }

        let mut gone = Vec::new();
        for (index, (pfd, device)) in self
            .poll_fds
            .iter()
            .zip(self.devices.iter_mut())
            .enumerate()
        {
            match readiness(pfd.revents) {
                Readiness::Idle => continue,
                Readiness::Gone => {
                    gone.push(index);
                    continue;
                }
                Readiness::Readable => {}
            }
            match device.fetch_events() {
                Ok(batch) => events.extend(
                    batch
                        .filter(|e| e.event_type() == EventType::KEY)
                        .map(|e| RawKeyEvent::new(e.code(), e.value())),
                ),
                Err(e) if is_disconnect(&e) => gone.push(index),
                Err(e) => log::warn!("failed to read from device: {}", e),
            }
        }

        if !gone.is_empty() {
            self.drop_devices(&gone)?;
        }
        Ok(events)
    }

    /// Forget disconnected devices; `Exhausted` once none are left
    fn drop_devices(&mut self, gone: &[usize]) -> EventLoopResult<()> {
        remove_indices(&mut self.poll_fds, gone);
        for device in remove_indices(&mut self.devices, gone) {
            log::warn!("{} disconnected", device_name(&device));
        }
        if self.devices.is_empty() {
            return Err(EventLoopError::Exhausted);
        }
        Ok(())
    }

    pub fn device_names(&self) -> Vec<String> {
        self.devices.iter().map(|d| device_name(d).to_string()).collect()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}
