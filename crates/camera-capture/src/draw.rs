//! embedded-graphics draw target over a BGR frame
//!
//! Lets the HUD and plot renderers use `embedded-graphics` primitives and
//! mono-font text directly on a [`VideoFrame`].

use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point, Size},
    pixelcolor::{Rgb888, RgbColor},
    primitives::Rectangle,
    Pixel,
};

use crate::frame::VideoFrame;

/// Mutable draw target over a frame. Out-of-bounds pixels are discarded.
pub struct Canvas<'a> {
    frame: &'a mut VideoFrame,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut VideoFrame) -> Self {
        Self { frame }
    }
}

impl Dimensions for Canvas<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(self.frame.width, self.frame.height),
        )
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.frame.put_pixel(
                point.x as u32,
                point.y as u32,
                [color.b(), color.g(), color.r()],
            );
        }
        Ok(())
    }
}

/// Alpha-blend a filled rectangle onto the frame, clipped to its bounds.
pub fn blend_rect(
    frame: &mut VideoFrame,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb888,
    alpha: f32,
) {
    let alpha = alpha.clamp(0.0, 1.0);
    let bgr = [color.b() as f32, color.g() as f32, color.r() as f32];
    let x_end = (x + width).min(frame.width);
    let y_end = (y + height).min(frame.height);

    for py in y..y_end {
        for px in x..x_end {
            if let Some(old) = frame.get_pixel(px, py) {
                let blended = [
                    (bgr[0] * alpha + old[0] as f32 * (1.0 - alpha)) as u8,
                    (bgr[1] * alpha + old[1] as f32 * (1.0 - alpha)) as u8,
                    (bgr[2] * alpha + old[2] as f32 * (1.0 - alpha)) as u8,
                ];
                frame.put_pixel(px, py, blended);
            }
        }
    }
}
