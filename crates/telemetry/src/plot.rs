//! Live EAR chart rendering

use camera_capture::draw::Canvas;
use camera_capture::VideoFrame;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::Text,
};
use serde::{Deserialize, Serialize};

use crate::EarHistory;

const COLOR_BG: Rgb888 = Rgb888::new(20, 20, 20);
const COLOR_SERIES: Rgb888 = Rgb888::new(0, 255, 0);
const COLOR_GRID: Rgb888 = Rgb888::new(128, 128, 128);
const COLOR_TEXT: Rgb888 = Rgb888::WHITE;

/// Fixed y-axis upper bound; EAR lives in roughly 0.0..0.4.
const Y_MAX: f64 = 0.5;

/// Plot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    /// Redraw every N frames; cached in between
    pub refresh_every: u64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 160,
            refresh_every: 3,
        }
    }
}

/// Renders the rolling EAR window as a small line chart.
///
/// The rendered image is cached between refresh cycles; `tick` only
/// redraws on the configured cadence.
pub struct PlotRenderer {
    config: PlotConfig,
    cached: VideoFrame,
    rendered_once: bool,
}

impl PlotRenderer {
    pub fn new(config: PlotConfig) -> Self {
        let cached = VideoFrame::black(config.width, config.height);
        Self {
            config,
            cached,
            rendered_once: false,
        }
    }

    /// Advance one frame; redraws on the refresh cadence (and on the very
    /// first call), otherwise returns the cached chart.
    pub fn tick(&mut self, frame_count: u64, history: &EarHistory) -> &VideoFrame {
        if !self.rendered_once || frame_count % self.config.refresh_every == 0 {
            self.render(history);
            self.rendered_once = true;
        }
        &self.cached
    }

    fn render(&mut self, history: &EarHistory) {
        let w = self.config.width;
        let h = self.config.height;
        self.cached = VideoFrame::black(w, h);
        let mut canvas = Canvas::new(&mut self.cached);

        // Background and frame.
        let _ = Rectangle::new(Point::zero(), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_fill(COLOR_BG))
            .draw(&mut canvas);
        let _ = Rectangle::new(Point::zero(), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_stroke(COLOR_GRID, 1))
            .draw(&mut canvas);

        // Chart area below the title row.
        let top = 18i32;
        let bottom = h as i32 - 4;
        let left = 4i32;
        let right = w as i32 - 4;

        // Horizontal gridlines at 0.1 EAR intervals.
        for i in 1..5 {
            let y = bottom - (bottom - top) * i / 5;
            let _ = Line::new(Point::new(left, y), Point::new(right, y))
                .into_styled(PrimitiveStyle::with_stroke(COLOR_GRID, 1))
                .draw(&mut canvas);
        }

        let style = MonoTextStyle::new(&FONT_6X10, COLOR_TEXT);
        let _ = Text::new("CANLI YORGUNLUK ANALIZI (EAR)", Point::new(left + 2, 12), style)
            .draw(&mut canvas);

        // Series polyline, oldest to newest across the full width.
        let samples: Vec<f64> = history.iter().collect();
        if samples.len() < 2 {
            return;
        }
        let span_x = (right - left) as f64 / (samples.len() - 1) as f64;
        let to_point = |i: usize, v: f64| {
            let v = if v.is_finite() { v.clamp(0.0, Y_MAX) } else { 0.0 };
            let x = left + (i as f64 * span_x) as i32;
            let y = bottom - ((v / Y_MAX) * (bottom - top) as f64) as i32;
            Point::new(x, y)
        };

        for i in 1..samples.len() {
            let _ = Line::new(to_point(i - 1, samples[i - 1]), to_point(i, samples[i]))
                .into_styled(PrimitiveStyle::with_stroke(COLOR_SERIES, 2))
                .draw(&mut canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PlotRenderer {
        PlotRenderer::new(PlotConfig::default())
    }

    #[test]
    fn test_chart_dimensions() {
        let mut plot = renderer();
        let img = plot.tick(1, &EarHistory::default());
        assert_eq!((img.width, img.height), (320, 160));
    }

    #[test]
    fn test_series_is_drawn() {
        let mut plot = renderer();
        let mut history = EarHistory::default();
        for _ in 0..100 {
            history.push(0.25);
        }
        let img = plot.tick(3, &history).clone();
        let green = img
            .data
            .chunks_exact(3)
            .filter(|px| px == &[0u8, 255, 0])
            .count();
        assert!(green > 100, "expected a visible series line, got {green} px");
    }

    #[test]
    fn test_cached_between_refreshes() {
        let mut plot = renderer();
        let mut history = EarHistory::default();
        let first = plot.tick(3, &history).clone();

        // History changes, but frame 4 is off-cadence: cached image reused.
        for _ in 0..100 {
            history.push(0.05);
        }
        let second = plot.tick(4, &history).clone();
        assert_eq!(first.data, second.data);

        // Frame 6 is on-cadence: redrawn.
        let third = plot.tick(6, &history).clone();
        assert_ne!(first.data, third.data);
    }
}
