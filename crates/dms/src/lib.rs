//! Driver Monitoring Core
//!
//! Threshold and frame-counting logic on top of the external vision models:
//! - Eye aspect ratio (EAR) computation from eye landmarks
//! - Debounced drowsiness / phone-use state tracking
//! - Status classification with explicit display priority

pub mod config;
pub mod ear;
pub mod state;

pub use config::DmsConfig;
pub use ear::eye_aspect_ratio;
pub use state::{Debounce, EyeTracker, Status};
