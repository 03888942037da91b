use image::{Rgb, RgbImage};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;

use crate::rendering::domain::canvas::Canvas;
use crate::rendering::domain::viewport::PlotArea;
use crate::shared::frame::Frame;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const LINE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// In-memory RGB canvas drawing 2 px anti-aliased lines (Xiaolin Wu).
pub struct RasterCanvas {
    image: RgbImage,
    clip: PlotArea,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let image = RgbImage::from_pixel(width, height, BACKGROUND);
        let clip = bounds_of(&image);
        Self { image, clip }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    fn stroke(&mut self, from: (f64, f64), to: (f64, f64)) {
        let Some((a, b)) = self.clip.clip(from, to) else {
            return;
        };
        let round = |p: (f64, f64)| (p.0.round() as i32, p.1.round() as i32);
        draw_antialiased_line_segment_mut(
            &mut self.image,
            round(a),
            round(b),
            LINE_COLOR,
            interpolate,
        );
    }
}

fn bounds_of(image: &RgbImage) -> PlotArea {
    PlotArea {
        left: 0.0,
        top: 0.0,
        right: (image.width().max(1) - 1) as f64,
        bottom: (image.height().max(1) - 1) as f64,
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    fn set_clip(&mut self, area: PlotArea) {
        self.clip = bounds_of(&self.image).intersect(&area);
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return;
        }
        self.stroke(from, to);
        // second pass one pixel across the major axis widens the stroke to 2 px
        let (ox, oy) = if (to.0 - from.0).abs() >= (to.1 - from.1).abs() {
            (0.0, 1.0)
        } else {
            (1.0, 0.0)
        };
        self.stroke((from.0 + ox, from.1 + oy), (to.0 + ox, to.1 + oy));
    }

    fn rasterize(&self, index: usize) -> Frame {
        Frame::new(
            self.image.as_raw().clone(),
            self.image.width(),
            self.image.height(),
            3,
            index,
        )
    }
}
