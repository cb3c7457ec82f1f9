//! Monitoring configuration

use serde::{Deserialize, Serialize};

/// Drowsiness monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmsConfig {
    /// EAR below this value counts as a closed-eye frame
    pub ear_threshold: f64,

    /// Consecutive closed-eye frames before the drowsiness alert fires
    pub required_frames: u32,

    /// Consecutive phone-present frames before the phone alert fires
    pub phone_required_frames: u32,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.22,
            required_frames: 15,
            phone_required_frames: 1,
        }
    }
}

impl DmsConfig {
    /// Create strict config (lower latency, more false positives)
    pub fn strict() -> Self {
        Self {
            required_frames: 10,
            ..Default::default()
        }
    }

    /// Create lenient config (higher latency, fewer false positives)
    pub fn lenient() -> Self {
        Self {
            required_frames: 25,
            phone_required_frames: 3,
            ..Default::default()
        }
    }
}
