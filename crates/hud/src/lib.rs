//! HUD Overlay
//!
//! Stateless drawing over the captured frame: semi-transparent info panels,
//! timestamp, status line, EAR readout, center crosshair, eye landmark dots,
//! phone detection brackets and the composited telemetry plot. The only
//! side effect is mutating the frame buffer in place.

use camera_capture::draw::{blend_rect, Canvas};
use camera_capture::VideoFrame;
use chrono::{DateTime, Local};
use dms::Status;
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, ascii::FONT_6X13, ascii::FONT_8X13, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
    text::Text,
};

pub const COLOR_GREEN: Rgb888 = Rgb888::new(0, 255, 0);
pub const COLOR_RED: Rgb888 = Rgb888::new(255, 0, 0);
pub const COLOR_ORANGE: Rgb888 = Rgb888::new(255, 165, 0);
pub const COLOR_HUD_BG: Rgb888 = Rgb888::new(20, 20, 20);
const COLOR_CAPTION: Rgb888 = Rgb888::new(200, 200, 200);
const COLOR_LANDMARK: Rgb888 = Rgb888::new(255, 255, 0);

const TOP_PANEL_HEIGHT: u32 = 80;
const BOTTOM_PANEL_HEIGHT: u32 = 40;
const PANEL_ALPHA: f32 = 0.7;

/// Plot placement margins (right and bottom).
const PLOT_MARGIN_X: u32 = 20;
const PLOT_MARGIN_Y: u32 = 50;

/// Status line color for the HUD.
pub fn status_color(status: Status) -> Rgb888 {
    match status {
        Status::Safe => COLOR_GREEN,
        Status::Drowsy => COLOR_RED,
        Status::PhoneUse => COLOR_ORANGE,
    }
}

/// Draw the info panels, timestamp, status line, EAR readout and
/// crosshair onto the frame.
pub fn draw_hud(frame: &mut VideoFrame, status: Status, ear: f64, now: DateTime<Local>) {
    let w = frame.width;
    let h = frame.height;

    blend_rect(frame, 0, 0, w, TOP_PANEL_HEIGHT, COLOR_HUD_BG, PANEL_ALPHA);
    blend_rect(
        frame,
        0,
        h.saturating_sub(BOTTOM_PANEL_HEIGHT),
        w,
        BOTTOM_PANEL_HEIGHT,
        COLOR_HUD_BG,
        PANEL_ALPHA,
    );

    let mut canvas = Canvas::new(frame);

    let clock = now.format("%d-%m-%Y %H:%M:%S");
    let small = MonoTextStyle::new(&FONT_8X13, COLOR_GREEN);
    let _ = Text::new(&format!("OPERASYON: {clock}"), Point::new(20, 30), small)
        .draw(&mut canvas);

    let status_style = MonoTextStyle::new(&FONT_10X20, status_color(status));
    let _ = Text::new(
        &format!("DURUM: {}", status.label()),
        Point::new(20, 65),
        status_style,
    )
    .draw(&mut canvas);

    let ear_text = if ear.is_finite() {
        format!("EAR: {ear:.2}")
    } else {
        "EAR: --".to_string()
    };
    let ear_style = MonoTextStyle::new(&FONT_10X20, COLOR_GREEN);
    let _ = Text::new(&ear_text, Point::new(w as i32 - 180, 50), ear_style).draw(&mut canvas);

    let caption = MonoTextStyle::new(&FONT_6X13, COLOR_CAPTION);
    let _ = Text::new(
        "SISTEM AKTIF - KAYIT ALINIYOR...",
        Point::new(w as i32 - 350, h as i32 - 15),
        caption,
    )
    .draw(&mut canvas);

    draw_crosshair(&mut canvas, w as i32 / 2, h as i32 / 2);
}

/// Gapped cross with a red center dot at the frame midpoint.
fn draw_crosshair(canvas: &mut Canvas<'_>, cx: i32, cy: i32) {
    let length = 20;
    let gap = 10;
    let style = PrimitiveStyle::with_stroke(COLOR_GREEN, 1);

    let arms = [
        (
            Point::new(cx - length - gap, cy),
            Point::new(cx - gap, cy),
        ),
        (
            Point::new(cx + gap, cy),
            Point::new(cx + length + gap, cy),
        ),
        (
            Point::new(cx, cy - length - gap),
            Point::new(cx, cy - gap),
        ),
        (
            Point::new(cx, cy + gap),
            Point::new(cx, cy + length + gap),
        ),
    ];
    for (start, end) in arms {
        let _ = Line::new(start, end).into_styled(style).draw(canvas);
    }

    let _ = Circle::with_center(Point::new(cx, cy), 4)
        .into_styled(PrimitiveStyle::with_fill(COLOR_RED))
        .draw(canvas);
}

/// Draw one dot per eye landmark.
pub fn draw_landmarks(frame: &mut VideoFrame, points: impl Iterator<Item = (f32, f32)>) {
    let mut canvas = Canvas::new(frame);
    for (x, y) in points {
        let _ = Circle::with_center(Point::new(x as i32, y as i32), 3)
            .into_styled(PrimitiveStyle::with_fill(COLOR_LANDMARK))
            .draw(&mut canvas);
    }
}

/// Orange rectangle with thick corner brackets around a detection.
pub fn draw_detection_box(frame: &mut VideoFrame, x1: f32, y1: f32, x2: f32, y2: f32) {
    let mut canvas = Canvas::new(frame);
    let (x1, y1, x2, y2) = (x1 as i32, y1 as i32, x2 as i32, y2 as i32);

    let thin = PrimitiveStyle::with_stroke(COLOR_ORANGE, 2);
    let edges = [
        (Point::new(x1, y1), Point::new(x2, y1)),
        (Point::new(x2, y1), Point::new(x2, y2)),
        (Point::new(x2, y2), Point::new(x1, y2)),
        (Point::new(x1, y2), Point::new(x1, y1)),
    ];
    for (start, end) in edges {
        let _ = Line::new(start, end).into_styled(thin).draw(&mut canvas);
    }

    let len = 20;
    let thick = PrimitiveStyle::with_stroke(COLOR_ORANGE, 4);
    let brackets = [
        (Point::new(x1, y1), Point::new(x1 + len, y1)),
        (Point::new(x1, y1), Point::new(x1, y1 + len)),
        (Point::new(x2, y2), Point::new(x2 - len, y2)),
        (Point::new(x2, y2), Point::new(x2, y2 - len)),
    ];
    for (start, end) in brackets {
        let _ = Line::new(start, end).into_styled(thick).draw(&mut canvas);
    }
}

/// Composite the cached plot into the bottom-right corner. Skipped (and
/// reported as `false`) when the target region would leave the frame.
pub fn composite_plot(frame: &mut VideoFrame, plot: &VideoFrame) -> bool {
    let Some(x) = frame
        .width
        .checked_sub(plot.width + PLOT_MARGIN_X)
    else {
        return false;
    };
    let Some(y) = frame
        .height
        .checked_sub(plot.height + PLOT_MARGIN_Y)
    else {
        return false;
    };
    frame.blit(plot, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn frame() -> VideoFrame {
        VideoFrame::black(640, 480)
    }

    #[test]
    fn test_panels_are_blended() {
        let mut f = frame();
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        draw_hud(&mut f, Status::Safe, 0.3, now);

        // Panel interior pixels moved off pure black.
        assert_ne!(f.get_pixel(320, 40), Some([0, 0, 0]));
        assert_ne!(f.get_pixel(320, 470), Some([0, 0, 0]));
    }

    #[test]
    fn test_crosshair_center_dot_is_red() {
        let mut f = frame();
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        draw_hud(&mut f, Status::Safe, 0.3, now);
        // BGR red.
        assert_eq!(f.get_pixel(320, 240), Some([0, 0, 255]));
    }

    fn readout_region_green_pixels(f: &VideoFrame) -> usize {
        // The EAR readout is the only green text right of x=455 in the
        // top panel.
        let mut hits = 0;
        for y in 30..55 {
            for x in 455..640 {
                if f.get_pixel(x, y) == Some([0, 255, 0]) {
                    hits += 1;
                }
            }
        }
        hits
    }

    #[test]
    fn test_ear_readout_placeholder_without_measurement() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut with_value = frame();
        draw_hud(&mut with_value, Status::Safe, 0.31, now);
        assert!(readout_region_green_pixels(&with_value) > 0);

        // NaN still renders a readout (the "--" placeholder), and renders
        // it differently from a numeric value.
        let mut without = frame();
        draw_hud(&mut without, Status::Safe, f64::NAN, now);
        assert!(readout_region_green_pixels(&without) > 0);
        assert_ne!(with_value.data, without.data);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(Status::Safe), COLOR_GREEN);
        assert_eq!(status_color(Status::Drowsy), COLOR_RED);
        assert_eq!(status_color(Status::PhoneUse), COLOR_ORANGE);
    }

    #[test]
    fn test_plot_composited_bottom_right() {
        let mut f = frame();
        let mut plot = VideoFrame::black(320, 160);
        plot.put_pixel(0, 0, [1, 2, 3]);

        assert!(composite_plot(&mut f, &plot));
        // Plot origin lands at (640-320-20, 480-160-50).
        assert_eq!(f.get_pixel(300, 270), Some([1, 2, 3]));
    }

    #[test]
    fn test_plot_skipped_when_oversized() {
        let mut small = VideoFrame::black(200, 100);
        let plot = VideoFrame::black(320, 160);
        assert!(!composite_plot(&mut small, &plot));
    }

    #[test]
    fn test_landmarks_drawn() {
        let mut f = frame();
        draw_landmarks(&mut f, [(100.0, 100.0)].into_iter());
        // BGR yellow.
        assert_eq!(f.get_pixel(100, 100), Some([0, 255, 255]));
    }
}
