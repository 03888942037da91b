use crate::curves::domain::smoothed_curve::SmoothedCurve;
use crate::shared::frame::Frame;

/// Turns one frame's curves into a fresh output image.
///
/// Every call starts from a blank canvas; nothing drawn for a previous
/// frame may show up in the next one.
pub trait FrameRenderer: Send {
    fn render(&mut self, curves: &[SmoothedCurve], index: usize) -> Frame;
}
