use image::GrayImage;
use imageproc::contours::{self, BorderType};

use crate::shared::constants::FOREGROUND_THRESHOLD;
use crate::shapes::domain::polygon::Polygon;
use crate::shapes::domain::shape_extractor::ShapeExtractor;

/// Finds the outermost contours of foreground regions.
///
/// Borders are traced with imageproc's Suzuki–Abe implementation; only
/// outer borders without a parent are kept, so holes and shapes nested
/// inside holes are ignored. Straight runs are then compressed to their
/// end points.
pub struct ContourExtractor {
    threshold: u8,
}

impl ContourExtractor {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self::new(FOREGROUND_THRESHOLD)
    }
}

impl ShapeExtractor for ContourExtractor {
    fn extract(&self, frame: &GrayImage) -> Vec<Polygon> {
        // The tracer only starts an outer border after a background pixel on
        // the left, so pad with one background pixel on every side.
        let mut padded = GrayImage::new(frame.width() + 2, frame.height() + 2);
        image::imageops::replace(&mut padded, frame, 1, 1);

        contours::find_contours_with_threshold::<i32>(&padded, self.threshold)
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| {
                let chain: Vec<(i32, i32)> = c.points.iter().map(|p| (p.x - 1, p.y - 1)).collect();
                Polygon::new(compress_chain(&chain))
            })
            .collect()
    }
}

/// Drops every point that continues the previous step in the same
/// direction, leaving only the vertices of the chain (cyclic).
fn compress_chain(chain: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let n = chain.len();
    if n < 3 {
        return chain.to_vec();
    }

    let step = |a: (i32, i32), b: (i32, i32)| ((b.0 - a.0).signum(), (b.1 - a.1).signum());

    (0..n)
        .filter(|&i| {
            let prev = chain[(i + n - 1) % n];
            let next = chain[(i + 1) % n];
            step(prev, chain[i]) != step(chain[i], next)
        })
        .map(|i| chain[i])
        .collect()
}
