use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Abstracts video encoding so the pipeline can write output without
/// depending on a specific codec library.
pub trait VideoWriter: Send {
    /// `metadata` describes the output stream (size and frame rate).
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Appends one frame. Frames whose size differs from the output size
    /// are rescaled.
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes pending packets and finalizes the container. Safe to call
    /// more than once.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
