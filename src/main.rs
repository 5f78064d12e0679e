//! gbd-tui - A terminal UI for a GBD benchmark database server
//!
//! This is the main entry point for the gbd-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::{HttpClient, Origin};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gbd-tui", version, about = "Query a GBD benchmark database server")]
struct Cli {
    /// Server URL; only scheme, host and port are used
    #[arg(short, long)]
    server: Option<String>,

    /// Rows per page: 10, 20 or 30
    #[arg(short, long)]
    page_size: Option<usize>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Save the effective settings to the config file and continue
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug)?;

    let mut config = Config::load().unwrap_or_default();
    if let Some(server) = cli.server {
        config.server = server;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    config.validate()?;

    if cli.write_config {
        let path = config.save()?;
        tracing::info!(path = %path.display(), "config written");
    }

    let origin = Origin::parse(&config.server)
        .with_context(|| format!("Invalid server URL '{}'", config.server))?;
    let client = HttpClient::new(origin, config.request_timeout())
        .context("Failed to build HTTP client")?;
    tracing::info!(server = %client.origin(), "starting");

    let mut app = App::new(Arc::new(client), config);

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting after error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file; anything written to stderr would corrupt the TUI
fn setup_logging(debug: bool) -> Result<()> {
    let Some(dir) = Config::config_dir() else {
        return Ok(());
    };
    std::fs::create_dir_all(&dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("gbd-tui.log"))?;

    let default_level = if debug { "gbd_tui=debug" } else { "gbd_tui=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_target(false)
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        app.on_frame_drawn()?;

        // Poll for events
        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            _ => None,
        };

        // Action might produce a follow-up action
        let mut current_action = action;
        while let Some(a) = current_action {
            current_action = app.update(a)?;
        }

        // Poll background requests on every pass, not only when idle
        app.update(Action::Tick)?;
    }

    Ok(())
}
