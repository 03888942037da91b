use crate::curves::domain::smoothed_curve::SmoothedCurve;
use crate::rendering::domain::canvas::Canvas;
use crate::rendering::domain::frame_renderer::FrameRenderer;
use crate::rendering::domain::viewport::Viewport;
use crate::shared::frame::Frame;

use super::raster_canvas::RasterCanvas;

/// Plots each curve as a line in a fixed data viewport.
///
/// The canvas is cleared before every frame and clipped to the plot area,
/// so only the current frame's curves are visible.
pub struct LinePlotRenderer<C: Canvas = RasterCanvas> {
    canvas: C,
    viewport: Viewport,
}

impl LinePlotRenderer<RasterCanvas> {
    pub fn new(width: u32, height: u32, data_width: f64, data_height: f64) -> Self {
        Self::with_canvas(RasterCanvas::new(width, height), data_width, data_height)
    }
}

impl<C: Canvas> LinePlotRenderer<C> {
    pub fn with_canvas(mut canvas: C, data_width: f64, data_height: f64) -> Self {
        let viewport = Viewport::new(data_width, data_height, canvas.width(), canvas.height());
        canvas.set_clip(viewport.plot_area());
        Self { canvas, viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn plot(&mut self, curve: &SmoothedCurve) {
        let pixels: Vec<(f64, f64)> = curve
            .points()
            .map(|(x, y)| self.viewport.to_pixel(x, y))
            .collect();
        self.canvas.draw_polyline(&pixels);
    }
}

impl<C: Canvas> FrameRenderer for LinePlotRenderer<C> {
    fn render(&mut self, curves: &[SmoothedCurve], index: usize) -> Frame {
        self.canvas.clear();
        for curve in curves {
            self.plot(curve);
        }
        self.canvas.rasterize(index)
    }
}
