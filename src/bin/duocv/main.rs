//! duocv - MIDI to CV from the computer keyboard
//!
//! Run with: cargo run --bin duocv [state.json]
//!
//! The default output device is treated as a DC-coupled interface: output
//! channel pairs carry pitch and gate of bus A, scaled so ±1.0 is ±10V.

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use app::DuoCv;
use color_eyre::eyre::WrapErr;

const LOG_FILE: &str = "duocv.log";
const STATE_FILE: &str = "duocv.json";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // The terminal belongs to the UI, so logs go to a file.
    let log = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let state_path = std::env::args().nth(1).unwrap_or_else(|| STATE_FILE.to_string());

    DuoCv::new().state_path(state_path).run()
}
