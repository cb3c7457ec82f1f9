//! Vision Model Seams
//!
//! Pretrained external models the monitor delegates to:
//! - MediaPipe FaceMesh landmarks (eye geometry for EAR)
//! - YOLOv8 object detection, filtered to handheld phones
//!
//! Both are ONNX Runtime sessions loaded from configured paths; without a
//! path the provider runs disabled (no face / no detections) so the rest
//! of the pipeline keeps working. The pipeline consumes them through the
//! [`LandmarkProvider`] / [`ObjectProvider`] traits, which tests stub.

pub mod landmarks;
pub mod phone;

pub use landmarks::{FaceMesh, LandmarkSet, LEFT_EYE, RIGHT_EYE};
pub use phone::{DetectionBox, PhoneDetector};

use camera_capture::VideoFrame;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vision error types
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Vision configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// FaceMesh landmark model path; `None` disables face tracking
    pub face_model_path: Option<String>,
    /// YOLOv8 model path; `None` disables phone detection
    pub phone_model_path: Option<String>,
    /// Detection confidence threshold
    pub phone_confidence: f32,
    /// COCO class id to keep ("cell phone")
    pub phone_class_id: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            face_model_path: None,
            phone_model_path: None,
            phone_confidence: 0.5,
            phone_class_id: 67,
        }
    }
}

/// Per-frame face landmark provider (zero or one face).
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, VisionError>;
}

/// Per-frame object detector, already filtered to the target class.
pub trait ObjectProvider {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<DetectionBox>, VisionError>;
}

/// Convert a BGR frame into an RGB image buffer for model preprocessing.
pub(crate) fn rgb_image(frame: &VideoFrame) -> image::RgbImage {
    image::RgbImage::from_fn(frame.width, frame.height, |x, y| {
        let [b, g, r] = frame.get_pixel(x, y).unwrap_or([0, 0, 0]);
        image::Rgb([r, g, b])
    })
}
