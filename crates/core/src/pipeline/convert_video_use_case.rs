use std::path::Path;
use std::time::Instant;

use crate::curves::domain::curve_fitter::{CurveFitter, FitResult};
use crate::rendering::domain::frame_renderer::FrameRenderer;
use crate::shapes::domain::shape_extractor::ShapeExtractor;
use crate::shared::constants::{PLOT_HEIGHT, PLOT_WIDTH};
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_logger::{
    NullPipelineLogger, PipelineLogger, METRIC_CURVES, METRIC_SKIPPED, STAGE_EXTRACT, STAGE_FIT,
    STAGE_RENDER, STAGE_WRITE,
};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Converts a video into line art: read → flip → grayscale → extract
/// contours → fit curves → render → write.
///
/// Frames are processed strictly in order, one at a time. Polygons that
/// cannot be fitted are dropped without affecting the rest of the frame.
/// Reader and writer are closed whether the run succeeds or fails.
pub struct ConvertVideoUseCase {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn VideoWriter>,
    extractor: Box<dyn ShapeExtractor>,
    fitter: Box<dyn CurveFitter>,
    renderer: Box<dyn FrameRenderer>,
    logger: Box<dyn PipelineLogger>,
    flip_vertical: bool,
    plot_size: (f64, f64),
    on_progress: Option<Box<dyn Fn(usize, usize) + Send>>,
}

impl ConvertVideoUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        extractor: Box<dyn ShapeExtractor>,
        fitter: Box<dyn CurveFitter>,
        renderer: Box<dyn FrameRenderer>,
    ) -> Self {
        Self {
            reader,
            writer,
            extractor,
            fitter,
            renderer,
            logger: Box::new(NullPipelineLogger),
            flip_vertical: true,
            plot_size: (PLOT_WIDTH, PLOT_HEIGHT),
            on_progress: None,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_flip_vertical(mut self, flip: bool) -> Self {
        self.flip_vertical = flip;
        self
    }

    /// Plot coordinate extent; only used to warn when input frames do not
    /// match it.
    pub fn with_plot_size(mut self, width: f64, height: f64) -> Self {
        self.plot_size = (width, height);
        self
    }

    /// `callback(frames_done, total_frames)`; `total_frames` is 0 when the
    /// input does not report a frame count.
    pub fn with_progress(mut self, callback: Box<dyn Fn(usize, usize) + Send>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Runs the conversion and returns the number of frames written.
    ///
    /// `output` describes the encoded stream; its `total_frames` is ignored.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        output: &VideoMetadata,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let input = self.reader.open(input_path)?;
        self.logger.info(&format!(
            "Converting {} ({}x{}, {} frames) to {} ({}x{} @ {} fps)",
            input_path.display(),
            input.width,
            input.height,
            input.total_frames,
            output_path.display(),
            output.width,
            output.height,
            output.fps
        ));

        if let Err(e) = self.writer.open(output_path, output) {
            self.reader.close();
            return Err(e);
        }

        let result = self.convert_frames(input.total_frames);

        self.reader.close();
        let closed = self.writer.close();
        self.logger.summary();

        let written = result?;
        closed?;
        Ok(written)
    }

    fn convert_frames(&mut self, total: usize) -> Result<usize, Box<dyn std::error::Error>> {
        let Self {
            reader,
            writer,
            extractor,
            fitter,
            renderer,
            logger,
            flip_vertical,
            plot_size,
            on_progress,
        } = self;

        let mut written = 0;
        let mut size_checked = false;

        for frame in reader.frames() {
            let mut frame = frame?;

            if !size_checked {
                size_checked = true;
                let size = (frame.width() as f64, frame.height() as f64);
                if size != *plot_size {
                    log::warn!(
                        "Input frames are {}x{} but the plot space is {}x{}; shapes will be drawn at their pixel coordinates",
                        frame.width(),
                        frame.height(),
                        plot_size.0,
                        plot_size.1
                    );
                }
            }

            if *flip_vertical {
                frame.flip_vertical();
            }

            let t = Instant::now();
            let polygons = extractor.extract(&frame.to_grayscale());
            logger.timing(STAGE_EXTRACT, elapsed_ms(t));

            let t = Instant::now();
            let mut curves = Vec::with_capacity(polygons.len());
            let mut skipped = 0usize;
            for polygon in &polygons {
                match fitter.fit(polygon) {
                    FitResult::Fitted(curve) => curves.push(curve),
                    FitResult::Skipped(reason) => {
                        skipped += 1;
                        log::debug!(
                            "Frame {}: skipped polygon with {} points: {reason}",
                            frame.index(),
                            polygon.len()
                        );
                    }
                }
            }
            logger.timing(STAGE_FIT, elapsed_ms(t));
            logger.metric(METRIC_CURVES, curves.len() as f64);
            logger.metric(METRIC_SKIPPED, skipped as f64);

            let t = Instant::now();
            let rendered = renderer.render(&curves, frame.index());
            logger.timing(STAGE_RENDER, elapsed_ms(t));

            let t = Instant::now();
            writer.write(&rendered)?;
            logger.timing(STAGE_WRITE, elapsed_ms(t));

            written += 1;
            logger.progress(written, total);
            if let Some(callback) = on_progress.as_ref() {
                callback(written, total);
            }
        }

        Ok(written)
    }
}
