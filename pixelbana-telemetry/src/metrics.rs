//! Prometheus metrics for simulation runs.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    /// Frame bytes handed to the display sink.
    pub frames_presented: Counter,
    /// Task steps dispatched by the scheduler.
    pub task_steps: Counter,
    /// Final virtual time of completed runs.
    pub run_virtual_ns: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let frames_presented = Counter::new(
            "pixelbana_frames_presented_total",
            "Frame bytes handed to the display sink",
        )
        .unwrap();
        let task_steps = Counter::new(
            "pixelbana_task_steps_total",
            "Task steps dispatched by the scheduler",
        )
        .unwrap();
        let run_virtual_ns = Histogram::with_opts(
            HistogramOpts::new(
                "pixelbana_run_virtual_ns",
                "Final virtual time of completed runs",
            )
            .buckets(vec![100.0, 1_000.0, 10_000.0, 100_000.0]),
        )
        .unwrap();

        registry.register(Box::new(frames_presented.clone())).unwrap();
        registry.register(Box::new(task_steps.clone())).unwrap();
        registry.register(Box::new(run_virtual_ns.clone())).unwrap();

        Self {
            registry,
            frames_presented,
            task_steps,
            run_virtual_ns,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gathers_registered_metrics() {
        let metrics = MetricsRecorder::new();
        metrics.frames_presented.inc();
        metrics.task_steps.inc_by(4.0);
        metrics.run_virtual_ns.observe(200.0);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("pixelbana_frames_presented_total"));
        assert!(text.contains("pixelbana_task_steps_total"));
        assert!(text.contains("pixelbana_run_virtual_ns"));
    }
}
