//! Audio Alerting
//!
//! Fires a fixed audio cue when an alert condition is active. At most one
//! playback is in flight at a time; overlapping requests are dropped, and
//! the trigger re-arms as soon as the previous playback completes.

mod trigger;

pub use trigger::{AlarmTrigger, Mpg123Player, Playback};

use thiserror::Error;

/// Playback error types
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Failed to start player: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Player exited with status {0}")]
    Exit(std::process::ExitStatus),
}
