use std::path::PathBuf;
use std::process;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use splinetrace_core::curves::infrastructure::periodic_spline_fitter::PeriodicSplineFitter;
use splinetrace_core::pipeline::convert_config::ConvertConfig;
use splinetrace_core::pipeline::convert_video_use_case::ConvertVideoUseCase;
use splinetrace_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use splinetrace_core::rendering::infrastructure::line_plot_renderer::LinePlotRenderer;
use splinetrace_core::shapes::infrastructure::contour_extractor::ContourExtractor;
use splinetrace_core::shared::constants::{
    COMPLETION_MESSAGE, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, FOREGROUND_THRESHOLD,
    OUTPUT_BIT_RATE, OUTPUT_CODEC, OUTPUT_FPS, OUTPUT_HEIGHT, OUTPUT_WIDTH, PLOT_HEIGHT,
    PLOT_WIDTH, SPLINE_SMOOTHING,
};
use splinetrace_core::shared::video_metadata::VideoMetadata;
use splinetrace_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use splinetrace_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;

/// Redraws every frame of a video as smoothed contour lines.
#[derive(Parser)]
#[command(name = "splinetrace")]
struct Cli {
    /// Input video.
    #[arg(default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Output video.
    #[arg(default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Output frame width in pixels.
    #[arg(long, default_value_t = OUTPUT_WIDTH)]
    width: u32,

    /// Output frame height in pixels.
    #[arg(long, default_value_t = OUTPUT_HEIGHT)]
    height: u32,

    /// Output frame rate.
    #[arg(long, default_value_t = OUTPUT_FPS)]
    fps: f64,

    /// Four-character codec code (XVID, MJPG, FFV1, H264, ...).
    #[arg(long, default_value = OUTPUT_CODEC)]
    codec: String,

    /// Encoder bit rate in bits per second.
    #[arg(long, default_value_t = OUTPUT_BIT_RATE)]
    bit_rate: usize,

    /// Horizontal extent of the plot coordinate space.
    #[arg(long, default_value_t = PLOT_WIDTH)]
    plot_width: f64,

    /// Vertical extent of the plot coordinate space.
    #[arg(long, default_value_t = PLOT_HEIGHT)]
    plot_height: f64,

    /// Spline smoothing tolerance (summed squared residual per contour).
    #[arg(long, default_value_t = SPLINE_SMOOTHING)]
    smoothing: f64,

    /// Points sampled along each curve (default: one per contour vertex).
    #[arg(long)]
    samples: Option<usize>,

    /// Gray values above this are treated as foreground.
    #[arg(long, default_value_t = FOREGROUND_THRESHOLD)]
    threshold: u8,

    /// Keep the decoded row order instead of flipping frames vertically.
    #[arg(long)]
    no_flip: bool,
}

impl From<Cli> for ConvertConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input_path: cli.input,
            output_path: cli.output,
            output_width: cli.width,
            output_height: cli.height,
            fps: cli.fps,
            codec: cli.codec,
            bit_rate: cli.bit_rate,
            plot_width: cli.plot_width,
            plot_height: cli.plot_height,
            smoothing: cli.smoothing,
            samples: cli.samples,
            threshold: cli.threshold,
            flip_vertical: !cli.no_flip,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConvertConfig::from(Cli::parse());
    let codec = config.validate()?;
    if !config.input_path.exists() {
        return Err(format!("Input file not found: {}", config.input_path.display()).into());
    }

    let progress = progress_bar()?;

    let writer = FfmpegWriter::new()
        .with_codec(codec)
        .with_bit_rate(config.bit_rate);
    let mut use_case = ConvertVideoUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(writer),
        Box::new(ContourExtractor::new(config.threshold)),
        Box::new(PeriodicSplineFitter::new(config.smoothing, config.samples)),
        Box::new(LinePlotRenderer::new(
            config.output_width,
            config.output_height,
            config.plot_width,
            config.plot_height,
        )),
    )
    .with_logger(Box::new(StdoutPipelineLogger::default()))
    .with_flip_vertical(config.flip_vertical)
    .with_plot_size(config.plot_width, config.plot_height)
    .with_progress(progress_callback(progress.clone()));

    let output = VideoMetadata::for_output(
        config.output_width,
        config.output_height,
        config.fps,
        &config.codec,
    );
    let result = use_case.execute(&config.input_path, &config.output_path, &output);
    progress.finish();

    let written = result?;
    log::info!(
        "Wrote {written} frames to {}",
        config.output_path.display()
    );
    println!("{COMPLETION_MESSAGE}");
    Ok(())
}

/// Frame progress bar. Its length is unknown until the reader reports a
/// frame count through [`progress_callback`].
fn progress_bar() -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let bar = ProgressBar::no_length();
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec} {eta})",
        )?
        .progress_chars("#>-"),
    );
    Ok(bar)
}

/// Moves `bar` to the number of frames done, sizing it from the first
/// report that carries a non-zero total.
fn progress_callback(bar: ProgressBar) -> Box<dyn Fn(usize, usize) + Send> {
    Box::new(move |done, total| {
        if total > 0 && bar.length() != Some(total as u64) {
            bar.set_length(total as u64);
        }
        bar.set_position(done as u64);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> ConvertConfig {
        let argv = std::iter::once("splinetrace").chain(args.iter().copied());
        ConvertConfig::from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_no_arguments_reproduce_defaults() {
        assert_eq!(parse(&[]), ConvertConfig::default());
    }

    #[test]
    fn test_positional_paths() {
        let config = parse(&["in.mkv", "out.avi"]);
        assert_eq!(config.input_path, PathBuf::from("in.mkv"));
        assert_eq!(config.output_path, PathBuf::from("out.avi"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "--width", "320", "--height", "240", "--codec", "MJPG", "--samples", "200",
            "--smoothing", "5.5", "--no-flip",
        ]);
        assert_eq!((config.output_width, config.output_height), (320, 240));
        assert_eq!(config.codec, "MJPG");
        assert_eq!(config.samples, Some(200));
        assert_eq!(config.smoothing, 5.5);
        assert!(!config.flip_vertical);
    }

    #[test]
    fn test_progress_bar_starts_without_length() {
        let bar = progress_bar().unwrap();
        assert_eq!(bar.length(), None);
        assert_eq!(bar.position(), 0);
    }

    #[rstest]
    #[case::known(3, 12, Some(12))]
    #[case::unknown(3, 0, None)]
    fn test_progress_callback_sizes_bar(
        #[case] done: usize,
        #[case] total: usize,
        #[case] length: Option<u64>,
    ) {
        let bar = ProgressBar::hidden();
        let report = progress_callback(bar.clone());
        report(done, total);
        assert_eq!(bar.length(), length);
        assert_eq!(bar.position(), done as u64);
    }

    #[test]
    fn test_rejects_non_numeric_width() {
        let argv = ["splinetrace", "--width", "wide"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
