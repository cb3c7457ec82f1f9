//! Drowsiness state tracking
//!
//! Two-state machine per signal: {OK, ALERT}. Entering ALERT is gated by
//! a consecutive-frame debounce counter; recovery is immediate on a single
//! good frame. The asymmetry is deliberate: entry tolerates noisy frames,
//! recovery does not lag behind the driver.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Debounced two-state machine.
///
/// Fed one observation per frame: `Some(true)` (trigger condition held),
/// `Some(false)` (good frame) or `None` (no measurement, state untouched).
#[derive(Debug, Clone)]
pub struct Debounce {
    required: u32,
    count: u32,
    active: bool,
}

impl Debounce {
    pub fn new(required: u32) -> Self {
        Self {
            required,
            count: 0,
            active: false,
        }
    }

    /// Advance one frame; returns whether the alert is active afterwards.
    pub fn update(&mut self, signal: Option<bool>) -> bool {
        match signal {
            None => {}
            Some(true) => {
                self.count = self.count.saturating_add(1);
                if self.count >= self.required && !self.active {
                    debug!(count = self.count, "alert threshold reached");
                    self.active = true;
                }
            }
            Some(false) => {
                if self.active {
                    debug!("alert cleared");
                }
                self.count = 0;
                self.active = false;
            }
        }
        self.active
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Consecutive trigger frames seen so far.
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Eye-closure tracker: thresholds the per-frame EAR and debounces it.
#[derive(Debug, Clone)]
pub struct EyeTracker {
    threshold: f64,
    debounce: Debounce,
}

impl EyeTracker {
    pub fn new(threshold: f64, required_frames: u32) -> Self {
        Self {
            threshold,
            debounce: Debounce::new(required_frames),
        }
    }

    /// Feed one EAR sample (NaN = no face this frame); returns whether the
    /// drowsiness alert is active.
    pub fn update(&mut self, ear: f64) -> bool {
        let signal = ear.is_finite().then(|| ear < self.threshold);
        self.debounce.update(signal)
    }

    pub fn active(&self) -> bool {
        self.debounce.active()
    }
}

/// Per-frame status classification.
///
/// Ordered by display priority: when several alerts are active at once the
/// highest-priority one owns the status line, so phone use overrides
/// drowsiness.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Status {
    #[default]
    Safe,
    Drowsy,
    PhoneUse,
}

impl Status {
    /// Resolve the displayed status from the active alert flags.
    pub fn resolve(drowsy: bool, phone: bool) -> Self {
        let mut status = Status::Safe;
        if drowsy {
            status = status.max(Status::Drowsy);
        }
        if phone {
            status = status.max(Status::PhoneUse);
        }
        status
    }

    /// HUD status line for this classification.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Safe => "GUVENLI",
            Status::Drowsy => "!!! UYUYOR !!!",
            Status::PhoneUse => "!!! TELEFON TESPIT !!!",
        }
    }

    pub fn is_alert(&self) -> bool {
        !matches!(self, Status::Safe)
    }
}
