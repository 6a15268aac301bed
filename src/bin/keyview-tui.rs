// Keyview TUI
// Terminal keyboard visualizer: live event log and on-screen keyboard

#[path = "../tui/mod.rs"]
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use keyview_core::Settings;

use tui::InputSource;

/// Terminal keyboard visualizer
#[derive(Parser, Debug)]
#[command(name = "keyview-tui")]
#[command(version)]
#[command(about = "Terminal keyboard visualizer", long_about = None)]
struct Args {
    /// Settings file (defaults to ~/.config/keyview/settings.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Read keyboards through evdev instead of the terminal
    #[arg(long)]
    evdev: bool,

    /// Devices to listen to with --evdev (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE", requires = "evdev")]
    devices: Vec<String>,

    /// Enable debug logging (written to stderr)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn source(&self) -> InputSource {
        if self.evdev {
            InputSource::Evdev
        } else {
            InputSource::Terminal
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load_default().context("failed to load default settings")?,
    };
    if !args.devices.is_empty() {
        settings.set_devices(args.devices.clone());
    }

    tui::run(settings, args.source())
}
