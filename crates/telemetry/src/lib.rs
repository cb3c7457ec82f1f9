//! EAR Telemetry
//!
//! Fixed-capacity rolling window of recent EAR samples and the small line
//! chart composited into the HUD. The chart is redrawn on a subsampled
//! cadence and cached in between to bound rendering cost.

mod history;
mod plot;

pub use history::EarHistory;
pub use plot::{PlotConfig, PlotRenderer};
