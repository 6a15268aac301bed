mod app;
mod handlers;
mod theme;
mod ui;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::prelude::*;

use keyview_core::event::{EventLoop, EventLoopError};
use keyview_core::input::KeyTranslator;
use keyview_core::{Feeds, Settings};

pub use app::InputSource;
use app::App;
use handlers::handle_input;
use ui::{draw_ui, log_height};

/// Frame interval; also bounds how long queued events wait to be drained
const TICK: Duration = Duration::from_millis(16);

/// Reads evdev keyboards on a background thread and publishes into the feeds.
///
/// When reading stops early the reason goes out on `notices`.
struct EvdevReader {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl EvdevReader {
    fn spawn(devices: Vec<String>, feeds: Feeds, notices: mpsc::Sender<String>) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let (ready_tx, ready_rx) = mpsc::channel();

        let flag = running.clone();
        let handle = std::thread::spawn(move || {
            let mut event_loop = match EventLoop::new_filtered(&devices) {
                Ok(event_loop) => {
                    let _ = ready_tx.send(Ok(event_loop.device_names()));
                    event_loop
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };

            let mut translator = KeyTranslator::new();
            while flag.load(Ordering::SeqCst) {
                match event_loop.poll_key_events(100) {
                    Ok(raw_events) => {
                        for raw in raw_events {
                            for input in translator.translate(raw) {
                                feeds.publish(input);
                            }
                        }
                    }
                    Err(EventLoopError::Exhausted) => {
                        log::warn!("all keyboards disconnected");
                        let _ = notices.send("Input stopped: keyboards disconnected".to_string());
                        break;
                    }
                    Err(err) => {
                        log::warn!("evdev read failed: {}", err);
                        let _ = notices.send(format!("Input stopped: {}", err));
                        break;
                    }
                }
            }
        });

        let names = ready_rx
            .recv()
            .context("evdev reader exited before opening devices")?
            .context("failed to open keyboards")?;
        log::info!("listening to {}", names.join(", "));

        Ok(Self { running, handle })
    }

    fn stop(self) {
        self.running.store(false, Ordering::SeqCst);
        if self.handle.join().is_err() {
            log::warn!("evdev reader panicked");
        }
    }
}

pub fn run(settings: Settings, source: InputSource) -> Result<()> {
    let mut app = App::new(settings, source).context("failed to load key layout")?;

    let reader = match source {
        InputSource::Evdev => {
            let (notices, notice_rx) = mpsc::channel();
            app.watch_notices(notice_rx);
            Some(EvdevReader::spawn(
                app.settings.devices().to_vec(),
                app.feeds(),
                notices,
            )?)
        }
        InputSource::Terminal => None,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    app.releases_reported = matches!(supports_keyboard_enhancement(), Ok(true));
    if app.releases_reported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop(&mut terminal, &mut app);

    if app.releases_reported {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(reader) = reader {
        reader.stop();
    }

    run_result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut redraw = true;
    loop {
        if app.tick() {
            redraw = true;
        }

        if redraw {
            terminal.draw(|f| draw_ui(f, app))?;
            redraw = false;
        }

        if !event::poll(TICK)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                let size = terminal.size()?;
                let visible = log_height(Rect::new(0, 0, size.width, size.height));
                if handle_input(app, key, visible) {
                    return Ok(());
                }
                redraw = true;
            }
            Event::Resize(_, _) => redraw = true,
            _ => {}
        }
    }
}
