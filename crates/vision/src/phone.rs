//! YOLOv8 phone detector

use camera_capture::VideoFrame;
use ndarray::{Array4, ArrayView2, Axis};
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{rgb_image, ObjectProvider, VisionConfig, VisionError};

/// YOLOv8 input resolution.
const INPUT_SIZE: u32 = 640;

/// IoU above which two candidate boxes are considered duplicates.
const NMS_IOU: f32 = 0.45;

/// YOLOv8 COCO output channels: 4 box values + 80 class scores.
const NUM_CHANNELS: usize = 84;

/// One detector output box in frame pixel coordinates.
///
/// Transient; discarded after the frame it was drawn on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub class_id: u32,
    pub confidence: f32,
}

impl DetectionBox {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &DetectionBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);
        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// YOLOv8 detector filtered to a single target class.
///
/// Invoked on a reduced frame cadence by the pipeline; the caller buffers
/// the last result for the frames in between.
pub struct PhoneDetector {
    session: Option<Session>,
    confidence: f32,
    target_class: u32,
}

impl PhoneDetector {
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let session = match &config.phone_model_path {
            Some(path) => {
                info!("Loading phone detection model from {}", path);
                let session = Session::builder()
                    .map_err(|e| VisionError::ModelLoad(e.to_string()))?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .map_err(|e| VisionError::ModelLoad(e.to_string()))?
                    .commit_from_file(path)
                    .map_err(|e| VisionError::ModelLoad(e.to_string()))?;
                Some(session)
            }
            None => {
                warn!("No phone model path configured; phone detection disabled");
                None
            }
        };
        Ok(Self {
            session,
            confidence: config.phone_confidence,
            target_class: config.phone_class_id,
        })
    }
}

impl ObjectProvider for PhoneDetector {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<DetectionBox>, VisionError> {
        let Some(session) = &self.session else {
            return Ok(Vec::new());
        };

        let resized = image::imageops::resize(
            &rgb_image(frame),
            INPUT_SIZE,
            INPUT_SIZE,
            image::imageops::FilterType::Nearest,
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

        // Output is (1, 4 + classes, anchors); transpose to anchor rows.
        let flat: Vec<f32> = raw.iter().copied().collect();
        let anchors = flat.len() / NUM_CHANNELS;
        let shaped = ndarray::Array2::from_shape_vec((NUM_CHANNELS, anchors), flat)
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let mut boxes = decode_detections(shaped.t(), self.confidence, self.target_class);

        // Scale from model space back to frame coordinates.
        let sx = frame.width as f32 / INPUT_SIZE as f32;
        let sy = frame.height as f32 / INPUT_SIZE as f32;
        for b in &mut boxes {
            b.x1 *= sx;
            b.x2 *= sx;
            b.y1 *= sy;
            b.y2 *= sy;
        }

        Ok(non_max_suppress(boxes, NMS_IOU))
    }
}

/// Decode YOLOv8 anchor rows `(anchors, 4 + classes)` in model space:
/// center/size box plus per-class scores. Keeps rows whose best class is
/// `target_class` at or above `confidence`.
pub fn decode_detections(
    pred: ArrayView2<'_, f32>,
    confidence: f32,
    target_class: u32,
) -> Vec<DetectionBox> {
    let mut boxes = Vec::new();
    for row in pred.axis_iter(Axis(0)) {
        let (class_id, score) = row
            .iter()
            .skip(4)
            .copied()
            .enumerate()
            .fold((0usize, f32::MIN), |best, (idx, v)| {
                if v > best.1 {
                    (idx, v)
                } else {
                    best
                }
            });

        if class_id as u32 != target_class || score < confidence {
            continue;
        }

        let (xc, yc, w, h) = (row[0], row[1], row[2], row[3]);
        boxes.push(DetectionBox {
            x1: xc - w / 2.0,
            y1: yc - h / 2.0,
            x2: xc + w / 2.0,
            y2: yc + h / 2.0,
            class_id: class_id as u32,
            confidence: score,
        });
    }
    boxes
}

/// Greedy NMS: highest-confidence box wins, overlapping duplicates drop.
pub fn non_max_suppress(mut boxes: Vec<DetectionBox>, iou_threshold: f32) -> Vec<DetectionBox> {
    boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut kept: Vec<DetectionBox> = Vec::new();
    for candidate in boxes {
        if kept.iter().all(|k| k.iou(&candidate) < iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}
