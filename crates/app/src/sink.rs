//! Frame presentation seam
//!
//! UI rendering is an external collaborator; the pipeline hands finished
//! frames to a [`FrameSink`]. The default sink keeps a "latest frame"
//! JPEG on disk for external viewers.

use std::path::PathBuf;

use camera_capture::VideoFrame;
use thiserror::Error;

/// Sink error types
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

/// Consumer of finished, composited frames.
pub trait FrameSink {
    fn present(&mut self, frame: &VideoFrame) -> Result<(), SinkError>;
}

/// Writes the latest frame as a JPEG, overwriting the previous one.
pub struct JpegPreview {
    path: PathBuf,
}

impl JpegPreview {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSink for JpegPreview {
    fn present(&mut self, frame: &VideoFrame) -> Result<(), SinkError> {
        let rgb = image::RgbImage::from_fn(frame.width, frame.height, |x, y| {
            let [b, g, r] = frame.get_pixel(x, y).unwrap_or([0, 0, 0]);
            image::Rgb([r, g, b])
        });
        rgb.save_with_format(&self.path, image::ImageFormat::Jpeg)?;
        Ok(())
    }
}
