//! Cabin Sentry Application
//!
//! Wires the capture, inference, state tracking, alerting and HUD pieces
//! into the synchronous per-frame pipeline, and owns the run configuration.

pub mod pipeline;
pub mod sink;

pub use pipeline::{FrameReport, Pipeline};
pub use sink::{FrameSink, JpegPreview};

use std::path::PathBuf;

use camera_capture::CameraConfig;
use dms::DmsConfig;
use serde::{Deserialize, Serialize};
use telemetry::PlotConfig;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vision::VisionConfig;

/// Application configuration. There is no CLI or environment surface;
/// a run is configured through these in-source defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub vision: VisionConfig,
    pub dms: DmsConfig,
    pub plot: PlotConfig,
    /// Run the phone detector every Nth frame
    pub detector_cadence: u64,
    /// Audio asset played on alert
    pub alarm_file: PathBuf,
    /// Incident report directory, created on demand
    pub results_dir: PathBuf,
    /// Latest composited frame is written here; `None` disables preview
    pub preview_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            vision: VisionConfig::default(),
            dms: DmsConfig::default(),
            plot: PlotConfig::default(),
            detector_cadence: 5,
            alarm_file: PathBuf::from("alarm.mp3"),
            results_dir: PathBuf::from("results"),
            preview_path: Some(PathBuf::from("preview.jpg")),
        }
    }
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
