//! Vitrine - A desktop-styled window manager for portfolio sites
//!
//! This binary drives `vitrine-core` headlessly: it restores the saved
//! session for a given viewport, applies deep links and commands the way the
//! browser host would, persists the result and prints it as JSON.
//!
//! # Features
//! - Single-instance apps, links that never become windows
//! - Cascade, fixed and centered placement with titlebar-safe clamping
//! - Minimize / maximize / restore with remembered geometry
//! - Tile and cascade arrangements
//! - Versioned JSON sessions, re-fitted to the current viewport on restore
//! - Viewport-dependent startup layouts and `?open=..&focus=..` deep links
//! - TOML configuration for chrome metrics, policies and the app registry

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod session_store;

use session_store::SessionStore;
use vitrine_core::config::Config;
use vitrine_core::{Command, DeepLink, Viewport, WindowManager};

/// Vitrine - headless driver for the portfolio window manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run in debug mode with verbose logging
    #[arg(short, long)]
    debug: bool,

    /// Print default configuration to stdout
    #[arg(long)]
    print_default_config: bool,

    /// Session file (defaults to the user data directory)
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Discard the saved session before running
    #[arg(long)]
    reset: bool,

    /// Browser viewport, e.g. 1920x1080
    #[arg(long, default_value = "1440x900")]
    viewport: String,

    /// Open the startup layout when there is no saved session
    #[arg(long)]
    startup: bool,

    /// URL query to apply, e.g. "?open=about,projects&focus=about"
    #[arg(long)]
    deep_link: Option<String>,

    /// Commands to run, e.g. "open about" "tile"
    commands: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Vitrine v{} starting...", env!("CARGO_PKG_VERSION"));

    if args.print_default_config {
        println!("{}", Config::default_config_string());
        return Ok(());
    }

    let config = match Config::load(args.config.as_deref()) {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        },
        Err(e) => {
            warn!("Failed to load config: {:#}, using defaults", e);
            Config::default()
        },
    };

    let viewport = Viewport::parse(&args.viewport)
        .ok_or_else(|| anyhow::anyhow!("Invalid viewport '{}', expected WxH", args.viewport))?;

    let store = args
        .session
        .or_else(SessionStore::default_path)
        .map(SessionStore::new)
        .ok_or_else(|| anyhow::anyhow!("No session path given and no data directory found"))?;

    info!("Using session file {:?}", store.path());
    if args.reset {
        store.reset()?;
    }

    let mut wm = WindowManager::new(config, viewport);
    let restored = match store.load()? {
        Some(raw) => wm.restore_session_json(&raw),
        None => false,
    };
    if !restored && args.startup {
        wm.apply_startup_layout();
    }

    if let Some(query) = &args.deep_link {
        let link = DeepLink::parse(query);
        if !wm.apply_deep_link(&link) {
            warn!("Deep link '{}' carried nothing to open", query);
        }
    }

    for raw in &args.commands {
        let command = Command::parse(raw);
        if !wm.exec(command) {
            info!("Command '{}' had no effect", raw);
        }
    }

    let snapshot = wm.snapshot();
    store.save(&snapshot)?;
    println!("{}", snapshot.to_json()?);

    Ok(())
}
