/// Fraction of the canvas left of the plot area.
pub const MARGIN_LEFT: f64 = 0.125;
/// Right edge of the plot area as a fraction of canvas width.
pub const MARGIN_RIGHT: f64 = 0.9;
/// Bottom edge of the plot area, measured upward from the canvas bottom.
pub const MARGIN_BOTTOM: f64 = 0.11;
/// Top edge of the plot area, measured upward from the canvas bottom.
pub const MARGIN_TOP: f64 = 0.88;

/// Axis-aligned rectangle in pixel coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }

    /// Overlap of two rectangles. Empty overlaps clip every segment away.
    pub fn intersect(&self, other: &PlotArea) -> PlotArea {
        PlotArea {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Clips the segment `a`-`b` to this rectangle (Liang–Barsky).
    /// Returns `None` when no part of the segment is inside.
    pub fn clip(&self, a: (f64, f64), b: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        for (p, q) in [
            (-dx, a.0 - self.left),
            (dx, self.right - a.0),
            (-dy, a.1 - self.top),
            (dy, self.bottom - a.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((
            (a.0 + t0 * dx, a.1 + t0 * dy),
            (a.0 + t1 * dx, a.1 + t1 * dy),
        ))
    }
}

/// Maps plot data coordinates onto canvas pixels.
///
/// The data range is fixed at `0..data_width` by `0..data_height` and
/// fills the plot area; data y points up, pixel y points down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    data_width: f64,
    data_height: f64,
    area: PlotArea,
}

impl Viewport {
    pub fn new(data_width: f64, data_height: f64, canvas_width: u32, canvas_height: u32) -> Self {
        let w = canvas_width as f64;
        let h = canvas_height as f64;
        Self {
            data_width,
            data_height,
            area: PlotArea {
                left: MARGIN_LEFT * w,
                top: (1.0 - MARGIN_TOP) * h,
                right: MARGIN_RIGHT * w,
                bottom: (1.0 - MARGIN_BOTTOM) * h,
            },
        }
    }

    pub fn plot_area(&self) -> PlotArea {
        self.area
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let a = &self.area;
        (
            a.left + x / self.data_width * (a.right - a.left),
            a.bottom - y / self.data_height * (a.bottom - a.top),
        )
    }
}
