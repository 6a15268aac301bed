use std::sync::mpsc::Receiver;

use keyview_core::{
    CompositionEngine, Feeds, InputEvent, LatestSnapshot, Settings, SettingsError, Snapshot,
    SHIFT_KEY_ID,
};

/// Where key events come from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputSource {
    /// Keys typed into this terminal
    Terminal,
    /// Every keyboard evdev can see
    Evdev,
}

impl InputSource {
    pub fn label(&self) -> &'static str {
        match self {
            InputSource::Terminal => "terminal",
            InputSource::Evdev => "evdev",
        }
    }
}

pub struct App {
    engine: CompositionEngine,
    latest: LatestSnapshot,
    pub snapshot: Snapshot,
    pub settings: Settings,
    pub source: InputSource,
    /// Terminal reports key releases (keyboard enhancement active)
    pub releases_reported: bool,
    pub status: String,
    /// First visible log line; `None` follows the tail
    pub log_scroll: Option<usize>,
    /// Shift state as last reported through terminal modifiers
    terminal_shift: bool,
    /// Status messages from a background Event Source
    notices: Option<Receiver<String>>,
}

impl App {
    pub fn new(settings: Settings, source: InputSource) -> Result<Self, SettingsError> {
        let catalog = settings.catalog()?;
        let mut engine = CompositionEngine::with_tracker(catalog, settings.modifier_tracker());
        let latest = LatestSnapshot::new();
        engine.subscribe(latest.clone());
        let snapshot = engine.snapshot().clone();

        Ok(Self {
            engine,
            latest,
            snapshot,
            settings,
            source,
            releases_reported: false,
            status: "Ready".to_string(),
            log_scroll: None,
            terminal_shift: false,
            notices: None,
        })
    }

    /// Push-side handles for a background Event Source
    pub fn feeds(&self) -> Feeds {
        self.engine.feeds()
    }

    pub fn watch_notices(&mut self, notices: Receiver<String>) {
        self.notices = Some(notices);
    }

    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status = msg.into();
    }

    /// Enqueue terminal input for the next tick
    pub fn publish(&mut self, input: InputEvent) {
        self.engine.feeds().publish(input);
    }

    /// Synthesize Shift transitions from terminal modifier flags when the
    /// terminal does not report Shift on its own
    pub fn sync_terminal_shift(&mut self, shift: bool) {
        if self.releases_reported || shift == self.terminal_shift {
            return;
        }
        self.terminal_shift = shift;
        let input = if shift {
            InputEvent::down(SHIFT_KEY_ID)
        } else {
            InputEvent::up(SHIFT_KEY_ID)
        };
        self.publish(input);
    }

    /// Drain pending events and pick up the newest snapshot.
    ///
    /// Returns true when there is something new to draw.
    pub fn tick(&mut self) -> bool {
        let noticed = self.poll_notices();
        self.engine.drain();
        match self.latest.take_fresh() {
            Some(snapshot) => {
                self.snapshot = snapshot;
                true
            }
            None => noticed,
        }
    }

    fn poll_notices(&mut self) -> bool {
        let Some(notices) = &self.notices else {
            return false;
        };
        let latest = notices.try_iter().last();
        match latest {
            Some(msg) => {
                self.set_status(msg);
                true
            }
            None => false,
        }
    }

    /// Snapshots that were superseded before a frame could show them
    pub fn skipped_frames(&self) -> u64 {
        self.latest.dropped()
    }

    /// Reload settings, rebuilding the layout and the Shift keys.
    ///
    /// Devices stay as they are: the running Event Source is not reopened.
    pub fn reload_layout(&mut self) {
        let devices = self.settings.devices().to_vec();
        if let Err(err) = self.settings.reload() {
            if self.settings.source_path().is_some() {
                self.set_status(format!("Reload failed: {}", err));
                return;
            }
        }
        self.settings.set_devices(devices);

        match self.settings.catalog() {
            Ok(catalog) => {
                let keys = catalog.len();
                self.engine.replace_catalog(catalog);
                self.engine.replace_tracker(self.settings.modifier_tracker());
                self.terminal_shift = false;
                self.set_status(format!("Layout reloaded ({} keys)", keys));
            }
            Err(err) => self.set_status(format!("Reload failed: {}", err)),
        }
    }

    pub fn scroll_up(&mut self, visible: usize) {
        let total = self.snapshot.log().len();
        let top = self
            .log_scroll
            .unwrap_or_else(|| total.saturating_sub(visible));
        self.log_scroll = Some(top.saturating_sub(1));
    }

    pub fn scroll_down(&mut self, visible: usize) {
        let total = self.snapshot.log().len();
        if let Some(top) = self.log_scroll {
            let next = top + 1;
            self.log_scroll = if next + visible >= total {
                None
            } else {
                Some(next)
            };
        }
    }

    /// Visible window of the log for a panel `visible` lines high
    pub fn visible_log(&self, visible: usize) -> &[String] {
        let log = self.snapshot.log();
        let start = match self.log_scroll {
            Some(top) => top.min(log.len().saturating_sub(visible)),
            None => return keyview_core::view::recent_log(&self.snapshot, visible),
        };
        let end = (start + visible).min(log.len());
        &log[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Settings::new(), InputSource::Terminal).unwrap()
    }

    #[test]
    fn test_tick_picks_up_latest() {
        let mut app = app();
        // Initial snapshot is still fresh
        assert!(app.tick());
        assert!(!app.tick());

        app.publish(InputEvent::press("a", "a"));
        app.publish(InputEvent::press("b", "b"));
        assert!(app.tick());
        assert_eq!(app.snapshot.log(), &["a is typed", "b is typed"]);
        assert_eq!(app.skipped_frames(), 1);
    }

    #[test]
    fn test_terminal_shift_synthesized() {
        let mut app = app();
        app.sync_terminal_shift(true);
        app.sync_terminal_shift(true);
        app.tick();
        assert!(app.snapshot.shift_held);
        assert_eq!(app.snapshot.log(), &["shift key is down"]);

        app.sync_terminal_shift(false);
        app.tick();
        assert!(!app.snapshot.shift_held);
    }

    #[test]
    fn test_terminal_shift_ignored_with_releases() {
        let mut app = app();
        app.releases_reported = true;
        app.sync_terminal_shift(true);
        app.tick();
        assert!(!app.snapshot.shift_held);
    }

    #[test]
    fn test_scroll_and_follow() {
        let mut app = app();
        for c in ["a", "b", "c", "d", "e"] {
            app.publish(InputEvent::press(c, c));
        }
        app.tick();
        assert_eq!(app.visible_log(2), &["d is typed", "e is typed"]);

        app.scroll_up(2);
        assert_eq!(app.log_scroll, Some(2));
        assert_eq!(app.visible_log(2), &["c is typed", "d is typed"]);

        app.scroll_down(2);
        assert_eq!(app.log_scroll, None);
    }

    #[test]
    fn test_background_notice_becomes_status() {
        let mut app = app();
        let (tx, rx) = std::sync::mpsc::channel();
        app.watch_notices(rx);
        app.tick();
        assert!(!app.tick());

        tx.send("Input stopped: keyboards disconnected".to_string()).unwrap();
        drop(tx);
        assert!(app.tick());
        assert_eq!(app.status, "Input stopped: keyboards disconnected");
        assert!(!app.tick());
    }

    #[test]
    fn test_reload_applies_shift_keys_and_keeps_devices() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[input]\nshift_keys = [\"shift\"]\n").unwrap();

        let mut settings = Settings::from_file(&path).unwrap();
        settings.set_devices(vec!["/dev/input/event3".to_string()]);
        let mut app = App::new(settings, InputSource::Evdev).unwrap();

        std::fs::write(&path, "[input]\nshift_keys = [\"lshift\"]\n").unwrap();
        app.reload_layout();
        assert_eq!(app.status, "Layout reloaded (103 keys)");
        assert_eq!(app.settings.devices(), &["/dev/input/event3"]);
        assert_eq!(app.settings.shift_keys(), &["lshift"]);

        app.publish(InputEvent::down("shift"));
        app.tick();
        assert!(!app.snapshot.shift_held);

        app.publish(InputEvent::down("lshift"));
        app.tick();
        assert!(app.snapshot.shift_held);
    }

    #[test]
    fn test_reload_without_settings_file_keeps_standard_layout() {
        let mut app = app();
        app.reload_layout();
        app.tick();
        assert_eq!(app.snapshot.keys().len(), 103);
        assert_eq!(app.status, "Layout reloaded (103 keys)");
    }
}
