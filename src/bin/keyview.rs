// Keyview Headless CLI
// Listens to keyboards (or replays a script) and prints the event log

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use keyview_core::event::{EventLoop, EventLoopError};
use keyview_core::input::KeyTranslator;
use keyview_core::{load_script, CompositionEngine, Settings, Snapshot, SnapshotSink};

/// Poll timeout so the shutdown flag is checked regularly
const POLL_TIMEOUT_MS: i32 = 100;

/// Live keyboard event log
#[derive(Parser, Debug)]
#[command(name = "keyview")]
#[command(version)]
#[command(about = "Live keyboard event log", long_about = None)]
struct Args {
    /// Settings file (defaults to ~/.config/keyview/settings.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Devices to listen to, by name or path (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate settings and layout, then exit
    #[arg(long)]
    check_config: bool,

    /// List available keyboard devices
    #[arg(long)]
    list_devices: bool,

    /// Replay a recorded event script instead of reading devices
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,
}

/// Prints log entries as they are appended
struct LogEcho {
    printed: usize,
}

impl LogEcho {
    /// Start after the entries already present
    fn new(printed: usize) -> Self {
        Self { printed }
    }
}

impl SnapshotSink for LogEcho {
    fn deliver(&mut self, snapshot: &Snapshot) {
        let entries = snapshot.log();
        for entry in entries.iter().skip(self.printed) {
            println!("{}", entry);
        }
        self.printed = self.printed.max(entries.len());
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load_default().context("failed to load default settings")?,
    };
    if !args.devices.is_empty() {
        settings.set_devices(args.devices.clone());
    }
    Ok(settings)
}

fn build_engine(settings: &Settings) -> Result<CompositionEngine> {
    let catalog = settings.catalog().context("failed to load key layout")?;
    log::debug!("catalog has {} keys", catalog.len());
    let mut engine = CompositionEngine::with_tracker(catalog, settings.modifier_tracker());
    if settings.echo() {
        engine.subscribe(LogEcho::new(0));
    }
    Ok(engine)
}

fn list_devices() -> Result<()> {
    let devices = EventLoop::list_devices().context("failed to enumerate input devices")?;
    println!("Found {} keyboard device(s):", devices.len());
    for device in &devices {
        match &device.path {
            Some(path) => println!("  {}: {} ({})", device.index, device.name, path),
            None => println!("  {}: {}", device.index, device.name),
        }
    }
    Ok(())
}

fn check_config(settings: &Settings) -> Result<()> {
    let catalog = settings.catalog().context("failed to load key layout")?;
    println!("Configuration is valid");
    match settings.source_path() {
        Some(path) => println!("  settings: {}", path.display()),
        None => println!("  settings: built-in defaults"),
    }
    println!("  layout: {} keys in {} rows", catalog.len(), catalog.rows().count());
    println!("  shift keys: {}", settings.shift_keys().join(", "));
    Ok(())
}

fn replay(engine: &mut CompositionEngine, path: &Path) -> Result<()> {
    let events =
        load_script(path).with_context(|| format!("failed to read script {}", path.display()))?;
    log::info!("replaying {} events from {}", events.len(), path.display());
    let emitted = engine.dispatch_all(events);
    log::debug!("{} snapshots emitted", emitted);
    Ok(())
}

fn install_signal_handler(running: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("failed to install signal handler")?;
    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::info!("received signal {}, shutting down", signal);
            running.store(false, Ordering::SeqCst);
        }
    });
    Ok(())
}

fn run_live(engine: &mut CompositionEngine, settings: &Settings) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    install_signal_handler(running.clone())?;

    let mut event_loop =
        EventLoop::new_filtered(settings.devices()).context("failed to open keyboards")?;
    log::info!("listening to {}", event_loop.device_names().join(", "));

    let feeds = engine.feeds();
    let mut translator = KeyTranslator::new();

    while running.load(Ordering::SeqCst) {
        let raw_events = match event_loop.poll_key_events(POLL_TIMEOUT_MS) {
            Ok(raw_events) => raw_events,
            Err(EventLoopError::Exhausted) => {
                log::info!("all keyboards disconnected, stopping");
                break;
            }
            Err(err) => return Err(err).context("failed to read key events"),
        };
        for raw in raw_events {
            for input in translator.translate(raw) {
                feeds.publish(input);
            }
        }
        engine.drain();
    }

    let snapshot = engine.snapshot();
    log::info!(
        "stopped after {} events, shift held: {}",
        snapshot.log().len(),
        snapshot.shift_held
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_devices {
        return list_devices();
    }

    let settings = load_settings(&args)?;

    if args.check_config {
        return check_config(&settings);
    }

    let mut engine = build_engine(&settings)?;

    match &args.replay {
        Some(path) => replay(&mut engine, path),
        None => run_live(&mut engine, &settings),
    }
}
