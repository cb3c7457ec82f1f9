//! Webcam Capture for the Cabin Monitor
//!
//! Provides V4L2 webcam capture (MJPEG, decoded to BGR24) and the
//! `VideoFrame` type the rest of the pipeline works on. The camera is an
//! external collaborator: the pipeline talks to it through the
//! [`FrameSource`] trait so tests can substitute scripted frames.

pub mod draw;
pub mod frame;
pub mod v4l2;

pub use frame::VideoFrame;
pub use v4l2::V4l2Camera;

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),
}

/// Camera configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 1280,
            height: 720,
            fps: 30,
        }
    }
}

/// Sequential frame provider.
///
/// `Ok(None)` is a dropped frame; the caller skips it and keeps going.
/// `Err` is fatal and ends the capture loop.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError>;
}
