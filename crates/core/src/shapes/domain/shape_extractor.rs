use image::GrayImage;

use super::polygon::Polygon;

/// Domain interface for turning a grayscale frame into closed outlines.
///
/// Extraction is a pure function of the frame. An empty result means the
/// frame has no foreground.
pub trait ShapeExtractor: Send {
    fn extract(&self, frame: &GrayImage) -> Vec<Polygon>;
}
