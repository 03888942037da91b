use std::path::PathBuf;

use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, FOREGROUND_THRESHOLD, OUTPUT_BIT_RATE, OUTPUT_CODEC,
    OUTPUT_FPS, OUTPUT_HEIGHT, OUTPUT_WIDTH, PLOT_HEIGHT, PLOT_WIDTH, SPLINE_SMOOTHING,
};
use crate::shared::fourcc::{FourCc, FourCcError};

/// Smallest curve resolution that still describes a closed loop.
pub const MIN_SAMPLES: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("output size must be non-zero, got {width}x{height}")]
    OutputSize { width: u32, height: u32 },
    #[error("frame rate must be positive and finite, got {0}")]
    FrameRate(f64),
    #[error("bit rate must be non-zero")]
    BitRate,
    #[error("plot extent must be positive and finite, got {width}x{height}")]
    PlotExtent { width: f64, height: f64 },
    #[error("smoothing must be positive and finite, got {0}")]
    Smoothing(f64),
    #[error("samples must be at least {MIN_SAMPLES}, got {0}")]
    Samples(usize),
    #[error(transparent)]
    Codec(#[from] FourCcError),
}

/// Everything one conversion run needs. `Default` reproduces the
/// reference behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub output_width: u32,
    pub output_height: u32,
    pub fps: f64,
    pub codec: String,
    pub bit_rate: usize,
    pub plot_width: f64,
    pub plot_height: f64,
    pub smoothing: f64,
    pub samples: Option<usize>,
    pub threshold: u8,
    pub flip_vertical: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            output_width: OUTPUT_WIDTH,
            output_height: OUTPUT_HEIGHT,
            fps: OUTPUT_FPS,
            codec: OUTPUT_CODEC.to_string(),
            bit_rate: OUTPUT_BIT_RATE,
            plot_width: PLOT_WIDTH,
            plot_height: PLOT_HEIGHT,
            smoothing: SPLINE_SMOOTHING,
            samples: None,
            threshold: FOREGROUND_THRESHOLD,
            flip_vertical: true,
        }
    }
}

impl ConvertConfig {
    /// Checks every field and returns the parsed codec.
    pub fn validate(&self) -> Result<FourCc, ConfigError> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(ConfigError::OutputSize {
                width: self.output_width,
                height: self.output_height,
            });
        }
        if !is_positive(self.fps) {
            return Err(ConfigError::FrameRate(self.fps));
        }
        if self.bit_rate == 0 {
            return Err(ConfigError::BitRate);
        }
        if !is_positive(self.plot_width) || !is_positive(self.plot_height) {
            return Err(ConfigError::PlotExtent {
                width: self.plot_width,
                height: self.plot_height,
            });
        }
        if !is_positive(self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        if let Some(n) = self.samples {
            if n < MIN_SAMPLES {
                return Err(ConfigError::Samples(n));
            }
        }

        let codec = FourCc::parse(&self.codec)?;
        codec.codec()?;
        Ok(codec)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
