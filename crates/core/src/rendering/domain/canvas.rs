use super::viewport::PlotArea;
use crate::shared::frame::Frame;

/// Drawing surface in pixel coordinates (origin top-left, y down).
pub trait Canvas: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resets every pixel to the background colour.
    fn clear(&mut self);

    /// Restricts drawing to `area`, intersected with the canvas bounds.
    fn set_clip(&mut self, area: PlotArea);

    /// Draws one line segment. Parts outside the clip area are dropped.
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64));

    /// Draws consecutive points joined by straight segments.

    fn draw_polyline(&mut self, points: &[(f64, f64)]) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1]);
        }
    }

    /// Copies the current contents into an RGB [`Frame`].
    fn rasterize(&self, index: usize) -> Frame;
}
