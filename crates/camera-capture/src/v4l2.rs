//! V4L2 webcam backend

use rscam::{Camera, Config};
use tracing::{info, warn};

use crate::frame::VideoFrame;
use crate::{CameraConfig, CameraError, FrameSource};

/// V4L2 webcam streaming MJPEG, decoded to BGR per frame.
pub struct V4l2Camera {
    cap: Camera,
    width: u32,
    height: u32,
    sequence: u64,
}

impl V4l2Camera {
    /// Open and start the camera described by `config`.
    pub fn open(config: &CameraConfig) -> Result<Self, CameraError> {
        let mut cap =
            Camera::new(&config.device).map_err(|e| CameraError::Open(e.to_string()))?;

        cap.start(&Config {
            interval: (1, config.fps),
            resolution: (config.width, config.height),
            format: b"MJPG",
            nbuffers: 2,
            ..Default::default()
        })
        .map_err(|e| CameraError::Open(e.to_string()))?;

        info!(
            device = %config.device,
            width = config.width,
            height = config.height,
            fps = config.fps,
            "camera started"
        );

        Ok(Self {
            cap,
            width: config.width,
            height: config.height,
            sequence: 0,
        })
    }
}

impl FrameSource for V4l2Camera {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError> {
        let raw = self
            .cap
            .capture()
            .map_err(|e| CameraError::Stream(e.to_string()))?;

        // A frame that fails to decode is dropped, not fatal.
        let decoded =
            match image::load_from_memory_with_format(&raw[..], image::ImageFormat::Jpeg) {
                Ok(img) => img.to_rgb8(),
                Err(e) => {
                    warn!(sequence = self.sequence, error = %e, "dropping undecodable frame");
                    self.sequence += 1;
                    return Ok(None);
                }
            };

        if decoded.width() != self.width || decoded.height() != self.height {
            warn!(
                got_width = decoded.width(),
                got_height = decoded.height(),
                "camera delivered unexpected resolution"
            );
        }

        let frame = VideoFrame::from_rgb(
            decoded.as_raw(),
            decoded.width(),
            decoded.height(),
            self.sequence,
        );
        self.sequence += 1;
        Ok(Some(frame))
    }
}
