//! Platform event glue: pointer hook, enable hotkey, desktop access.
//!
//! The core engine only sees the [`Desktop`] trait and its two handler
//! entry points; everything OS-specific lives behind this module.

#[cfg(windows)]
mod windows;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use edge_flow_core::engine::{Desktop, SwitchEngine};

/// Screen geometry and cursor placement for this platform.
#[cfg(windows)]
pub fn desktop() -> Result<Box<dyn Desktop>> {
    Ok(Box::new(windows::WindowsDesktop))
}

/// Install the pointer hook and enable hotkey, then pump events until the
/// message loop ends. Blocks the calling thread.
#[cfg(windows)]
pub fn run_event_loop(engine: Arc<Mutex<SwitchEngine>>) -> Result<()> {
    windows::run_event_loop(engine)
}

#[cfg(not(windows))]
pub fn desktop() -> Result<Box<dyn Desktop>> {
    anyhow::bail!("pointer tracking is only implemented on Windows")
}

#[cfg(not(windows))]
pub fn run_event_loop(_engine: Arc<Mutex<SwitchEngine>>) -> Result<()> {
    anyhow::bail!("pointer tracking is only implemented on Windows")
}
