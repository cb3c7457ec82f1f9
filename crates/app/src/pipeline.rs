//! Per-frame processing pipeline
//!
//! One fully sequential pass per captured frame: landmark inference →
//! EAR → state update → {incident log, alarm} → telemetry → HUD. Generic
//! over the model seams so tests can script the inputs.

use alerting::AlarmTrigger;
use camera_capture::VideoFrame;
use chrono::{DateTime, Local};
use dms::ear::{average_ear, eye_aspect_ratio};
use dms::{Debounce, EyeTracker, Status};
use incident_log::{IncidentLog, Violation};
use telemetry::{EarHistory, PlotRenderer};
use tracing::warn;
use vision::{DetectionBox, LandmarkProvider, ObjectProvider, LEFT_EYE, RIGHT_EYE};

use crate::AppConfig;

/// Baseline EAR shown when there is no measurement this frame.
const BASELINE_EAR: f64 = 0.3;

/// Outcome of one processed frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    pub status: Status,
    /// Raw per-frame EAR; NaN when no face was measured
    pub ear: f64,
}

/// The per-frame pipeline and all process-wide monitoring state.
pub struct Pipeline<L, O> {
    face: L,
    phone: O,
    eye_tracker: EyeTracker,
    phone_tracker: Debounce,
    alarm: AlarmTrigger,
    incidents: IncidentLog,
    history: EarHistory,
    plot: PlotRenderer,
    /// Last detector output, reused on frames between detector runs
    phone_boxes: Vec<DetectionBox>,
    detector_cadence: u64,
    frame_count: u64,
}

impl<L: LandmarkProvider, O: ObjectProvider> Pipeline<L, O> {
    pub fn new(config: &AppConfig, face: L, phone: O, alarm: AlarmTrigger) -> Self {
        Self {
            face,
            phone,
            eye_tracker: EyeTracker::new(config.dms.ear_threshold, config.dms.required_frames),
            phone_tracker: Debounce::new(config.dms.phone_required_frames),
            alarm,
            incidents: IncidentLog::new(),
            history: EarHistory::with_default_capacity(),
            plot: PlotRenderer::new(config.plot.clone()),
            phone_boxes: Vec::new(),
            detector_cadence: config.detector_cadence.max(1),
            frame_count: 0,
        }
    }

    /// Process one frame in place and report the resulting status.
    pub fn process(&mut self, frame: &mut VideoFrame) -> FrameReport {
        self.process_at(frame, Local::now())
    }

    pub fn process_at(&mut self, frame: &mut VideoFrame, now: DateTime<Local>) -> FrameReport {
        self.frame_count += 1;
        let (width, height) = (frame.width, frame.height);

        // Face landmarks → per-frame EAR (NaN = no measurement).
        let landmarks = match self.face.detect(frame) {
            Ok(lm) => lm,
            Err(e) => {
                warn!(error = %e, "landmark inference failed");
                None
            }
        };
        let mut ear = f64::NAN;
        if let Some(lm) = &landmarks {
            if let (Some(left), Some(right)) = (
                lm.eye_points(&LEFT_EYE, width, height),
                lm.eye_points(&RIGHT_EYE, width, height),
            ) {
                ear = average_ear(eye_aspect_ratio(&left), eye_aspect_ratio(&right));
            }
        }
        let drowsy = self.eye_tracker.update(ear);

        // Phone detection runs on a reduced cadence; intermediate frames
        // reuse the buffered result.
        if self.frame_count % self.detector_cadence == 0 {
            match self.phone.detect(frame) {
                Ok(boxes) => self.phone_boxes = boxes,
                Err(e) => warn!(error = %e, "phone inference failed"),
            }
        }
        let phone = self.phone_tracker.update(Some(!self.phone_boxes.is_empty()));

        let status = Status::resolve(drowsy, phone);
        if drowsy {
            self.incidents.record(Violation::Drowsiness);
        }
        if phone {
            self.incidents.record(Violation::PhoneUse);
        }
        if status.is_alert() {
            // Dropped while a playback is in flight; re-armed right after.
            self.alarm.fire();
        }

        let shown_ear = if ear.is_finite() { ear } else { BASELINE_EAR };
        self.history.push(shown_ear);

        // Overlay drawing, same order as the capture pass: landmarks,
        // detection boxes, plot, panels.
        if let Some(lm) = &landmarks {
            let eye_indices: Vec<usize> =
                LEFT_EYE.iter().chain(RIGHT_EYE.iter()).copied().collect();
            hud::draw_landmarks(frame, lm.pixel_points(&eye_indices, width, height));
        }
        for b in &self.phone_boxes {
            hud::draw_detection_box(frame, b.x1, b.y1, b.x2, b.y2);
        }
        let plot = self.plot.tick(self.frame_count, &self.history);
        hud::composite_plot(frame, plot);
        // HUD gets the raw value; it renders a placeholder readout when
        // there was no measurement this frame.
        hud::draw_hud(frame, status, ear, now);

        FrameReport { status, ear }
    }

    pub fn incidents(&self) -> &IncidentLog {
        &self.incidents
    }

    /// Consume the pipeline at shutdown, handing the log to the flusher.
    pub fn into_incidents(self) -> IncidentLog {
        self.incidents
    }

    pub fn alarm(&self) -> &AlarmTrigger {
        &self.alarm
    }
}
