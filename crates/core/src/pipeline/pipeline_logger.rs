use std::collections::BTreeMap;
use std::time::Instant;

/// Stage names reported through [`PipelineLogger::timing`].
pub const STAGE_EXTRACT: &str = "extract";
pub const STAGE_FIT: &str = "fit";
pub const STAGE_RENDER: &str = "render";
pub const STAGE_WRITE: &str = "write";

/// Metric names reported through [`PipelineLogger::metric`].
pub const METRIC_CURVES: &str = "curves";
pub const METRIC_SKIPPED: &str = "skipped_polygons";

/// Observer for conversion events: per-frame progress, stage timings and
/// counts. Keeps the conversion loop independent of where reports go.
pub trait PipelineLogger: Send {
    /// Report frame-level progress. `total` is 0 when the frame count is
    /// unknown.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-frame count (e.g. curves drawn, polygons skipped).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and maximum of one series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Series {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl Series {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = if self.count == 1 { value } else { self.max.max(value) };
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates stage timings and per-frame counts through the `log` facade
/// and prints a summary at the end of the run.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Series>,
    metrics: BTreeMap<String, Series>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    pub fn timings_for(&self, stage: &str) -> Option<&Series> {
        self.timings.get(stage)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&Series> {
        self.metrics.get(name)
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Conversion summary ({} frames, {elapsed_s:.1}s total):",
            self.frames_seen
        )];

        let stage_total_ms: f64 = self.timings.values().map(|s| s.total).sum();
        for (stage, series) in &self.timings {
            let pct = if stage_total_ms > 0.0 {
                series.total / stage_total_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:8}: avg {:6.1}ms  max {:6.1}ms  ({pct:4.1}%)",
                series.mean(),
                series.max
            ));
        }

        for (name, series) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}  total {:.0}",
                series.mean(),
                series.total
            ));
        }

        if self.frames_seen > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames_seen as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = self.frames_seen.max(current);
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::debug!("Converted {current}/{total} frames ({pct:.1}%)");
        } else {
            log::debug!("Converted {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
