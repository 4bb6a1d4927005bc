use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Observer for pipeline events.
///
/// Use cases report through this trait so library callers, the CLI and
/// tests can each decide what (if anything) gets printed.
pub trait PipelineLogger: Send {
    /// Report progress within a stage. `total` is 0 when unknown.
    fn progress(&mut self, stage: &str, current: usize, total: usize);

    /// Record how long one unit of work in a stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time value (e.g. frames per batch).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _stage: &str, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Sends progress and messages to the `log` crate at info level and keeps
/// per-stage timings for a closing summary.
///
/// Progress lines are emitted every `throttle` units per stage, plus on
/// the last unit when the total is known.
pub struct StdoutPipelineLogger {
    throttle: usize,
    timings: BTreeMap<String, Vec<f64>>,
    metrics: BTreeMap<String, Vec<f64>>,
    last_progress: HashMap<String, usize>,
    start_time: Instant,
}

impl StdoutPipelineLogger {
    pub fn new(throttle: usize) -> Self {
        Self {
            throttle: throttle.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            last_progress: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Formatted summary, or `None` if nothing was timed or measured.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!("Run summary ({elapsed_s:.1}s total):")];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            lines.push(format!(
                "  {stage:12}: {count:6} x avg {avg_ms:7.2}ms = {total_ms:8.0}ms",
                count = durations.len()
            ));
        }

        for (name, values) in &self.metrics {
            let avg = values.iter().sum::<f64>() / values.len().max(1) as f64;
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        for (stage, current) in sorted(&self.last_progress) {
            lines.push(format!("  {stage} completed: {current}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    fn should_report(&self, current: usize, total: usize) -> bool {
        current % self.throttle == 0 || (total > 0 && current == total)
    }
}

fn sorted(map: &HashMap<String, usize>) -> Vec<(&String, &usize)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort();
    entries
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(50)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, stage: &str, current: usize, total: usize) {
        self.last_progress.insert(stage.to_string(), current);
        if !self.should_report(current, total) {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("{stage}: {current}/{total} ({pct:.1}%)");
        } else {
            log::info!("{stage}: {current}");
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
