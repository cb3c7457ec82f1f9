//! FaceMesh landmark provider

use camera_capture::VideoFrame;
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use tracing::{info, warn};

use crate::{rgb_image, LandmarkProvider, VisionConfig, VisionError};

/// FaceMesh input resolution.
const INPUT_SIZE: u32 = 192;

/// MediaPipe FaceMesh eye contour indices, ordered `[p1..p6]` for the EAR
/// formula (p1/p4 horizontal corners, p2/p6 and p3/p5 vertical pairs).
pub const LEFT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
pub const RIGHT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Ordered 2D face landmarks in normalized [0,1] image coordinates.
///
/// Transient: produced per frame, discarded after EAR extraction and
/// HUD drawing.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<(f32, f32)>,
}

impl LandmarkSet {
    pub fn new(points: Vec<(f32, f32)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, idx: usize) -> Option<(f32, f32)> {
        self.points.get(idx).copied()
    }

    /// Six denormalized (pixel-space) points for one eye, in EAR order.
    /// `None` when the set does not cover the requested indices.
    pub fn eye_points(
        &self,
        indices: &[usize; 6],
        width: u32,
        height: u32,
    ) -> Option<[(f32, f32); 6]> {
        let mut out = [(0.0, 0.0); 6];
        for (slot, &idx) in out.iter_mut().zip(indices) {
            let (x, y) = self.point(idx)?;
            *slot = (x * width as f32, y * height as f32);
        }
        Some(out)
    }

    /// Denormalized points for an arbitrary index list, skipping any the
    /// set does not cover. Used for HUD landmark dots.
    pub fn pixel_points<'a>(
        &'a self,
        indices: &'a [usize],
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (f32, f32)> + 'a {
        indices.iter().filter_map(move |&idx| {
            self.point(idx)
                .map(|(x, y)| (x * width as f32, y * height as f32))
        })
    }
}

/// FaceMesh landmark model (ONNX Runtime session).
pub struct FaceMesh {
    session: Option<Session>,
}

impl FaceMesh {
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let session = match &config.face_model_path {
            Some(path) => {
                info!("Loading FaceMesh model from {}", path);
                let session = Session::builder()
                    .map_err(|e| VisionError::ModelLoad(e.to_string()))?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .map_err(|e| VisionError::ModelLoad(e.to_string()))?
                    .commit_from_file(path)
                    .map_err(|e| VisionError::ModelLoad(e.to_string()))?;
                Some(session)
            }
            None => {
                warn!("No face model path configured; landmark provider disabled");
                None
            }
        };
        Ok(Self { session })
    }

    fn infer(&self, session: &Session, frame: &VideoFrame) -> Result<Vec<f32>, VisionError> {
        let resized = image::imageops::resize(
            &rgb_image(frame),
            INPUT_SIZE,
            INPUT_SIZE,
            image::imageops::FilterType::Triangle,
        );

        let side = INPUT_SIZE as usize;
        let mut input = Array4::<f32>::zeros((1, 3, side, side));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                input[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
            }
        }

        let outputs = session
            .run(ort::inputs![input].map_err(|e| VisionError::Inference(e.to_string()))?)
            .map_err(|e| VisionError::Inference(e.to_string()))?;
        let raw = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::Inference(e.to_string()))?;
        Ok(raw.iter().copied().collect())
    }
}

impl LandmarkProvider for FaceMesh {
    /// Zero or one landmark sets for the frame. Disabled provider means
    /// no face, which the tracker treats as "no measurement".
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, VisionError> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let raw = self.infer(session, frame)?;
        Ok(decode_landmarks(&raw))
    }
}

/// Decode the FaceMesh output tensor (x, y, z triples in input-pixel
/// coordinates) into normalized 2D landmarks.
pub fn decode_landmarks(raw: &[f32]) -> Option<LandmarkSet> {
    if raw.len() < 3 {
        return None;
    }
    let scale = INPUT_SIZE as f32;
    let points = raw
        .chunks_exact(3)
        .map(|xyz| (xyz[0] / scale, xyz[1] / scale))
        .collect();
    Some(LandmarkSet::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scales_to_normalized() {
        let raw = [96.0, 48.0, 0.0, 192.0, 192.0, -3.0];
        let set = decode_landmarks(&raw).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.point(0), Some((0.5, 0.25)));
        assert_eq!(set.point(1), Some((1.0, 1.0)));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(decode_landmarks(&[]).is_none());
    }

    #[test]
    fn test_eye_points_denormalize() {
        // 6 points at indices 0..6; ask for them in shuffled order.
        let set = LandmarkSet::new(vec![
            (0.1, 0.1),
            (0.2, 0.1),
            (0.3, 0.1),
            (0.4, 0.1),
            (0.3, 0.2),
            (0.2, 0.2),
        ]);
        let pts = set.eye_points(&[0, 1, 2, 3, 4, 5], 100, 200).unwrap();
        assert_eq!(pts[0], (10.0, 20.0));
        assert_eq!(pts[3], (40.0, 20.0));
    }

    #[test]
    fn test_eye_points_missing_index() {
        let set = LandmarkSet::new(vec![(0.5, 0.5)]);
        assert!(set.eye_points(&LEFT_EYE, 100, 100).is_none());
    }
}
