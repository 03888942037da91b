//! Reference constants for the line-art conversion.

pub const DEFAULT_INPUT_PATH: &str = "bad_apple.mp4";
pub const DEFAULT_OUTPUT_PATH: &str = "bad_apple_interpolated.avi";

/// Output frames are encoded at exactly this size.
pub const OUTPUT_WIDTH: u32 = 640;
pub const OUTPUT_HEIGHT: u32 = 480;
pub const OUTPUT_FPS: f64 = 30.0;
pub const OUTPUT_CODEC: &str = "XVID";
pub const OUTPUT_BIT_RATE: usize = 2_000_000;

/// Plot coordinate space: the viewport is fixed to `0..PLOT_WIDTH` by
/// `0..PLOT_HEIGHT` so every frame is drawn at the same scale.
pub const PLOT_WIDTH: f64 = 480.0;
pub const PLOT_HEIGHT: f64 = 360.0;

/// Smoothing tolerance: upper bound on the summed squared residual of a fit.
pub const SPLINE_SMOOTHING: f64 = 2.0;

/// A periodic cubic fit needs at least this many distinct vertices.
pub const MIN_SPLINE_POINTS: usize = 4;

/// Gray values strictly above this count as foreground.
pub const FOREGROUND_THRESHOLD: u8 = 0;

pub const COMPLETION_MESSAGE: &str = "The video is ready!";
