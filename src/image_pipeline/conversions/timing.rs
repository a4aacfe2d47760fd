use std::time::{Duration, Instant};
use tracing::debug;

/// One finished stage of a photo's processing.
#[derive(Debug, Clone, Copy)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Wall-clock time spent in each stage for a single photo.
#[derive(Debug, Clone, Default)]
pub struct PipelineTimings {
    file_name: String,
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn for_file(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            steps: Vec::new(),
        }
    }

    /// Name of the photo these timings belong to.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Stops `timer` and appends its stage.
    pub fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
    }

    pub fn add_step(&mut self, name: &'static str, duration: Duration) {
        self.steps.push(StepTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Time spent in `name`, summed over repeats. `None` if the stage never ran.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.steps
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.duration)
            .reduce(|a, b| a + b)
    }

    pub fn slowest_step(&self) -> Option<StepTiming> {
        self.steps.iter().copied().max_by_key(|s| s.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total_ms = self.total_duration().as_secs_f64() * 1000.0;
        for step in &self.steps {
            let ms = step.duration.as_secs_f64() * 1000.0;
            let share = if total_ms > 0.0 { ms / total_ms * 100.0 } else { 0.0 };
            debug!(file = %self.file_name, step = step.name, "{:>10.3}ms ({:>5.1}%)", ms, share);
        }
        if let Some(slowest) = self.slowest_step() {
            debug!(file = %self.file_name, slowest = slowest.name, "total {:.3}ms", total_ms);
        }
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
