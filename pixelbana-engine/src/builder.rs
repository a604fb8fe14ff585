//! One-time wiring of the datapath.
//!
//! Builds every component, injects the references each stage needs, and
//! registers the scheduled stages. The wiring is immutable once
//! [`crate::runtime::SimulationRuntime::run`] starts; fan-out is permitted
//! only at the interconnect.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use pixelbana_config::{PixelbanaConfig, RoutingPolicyConfig, SourceMode};
use pixelbana_core::sched::Scheduler;
use pixelbana_core::transport::{Delay, TargetRef};
use pixelbana_core::SimError;
use pixelbana_datapath::{
    CaptureDriver, DisplaySink, FixedPixelSource, FrameRegister, Interconnect, MemoryStore,
    OutputConsumer, PixelSource, Processor, RandomPixelSource, Receiver, RoutingPolicy, TraceSink,
};
use pixelbana_telemetry::MetricsRecorder;

use crate::runtime::SimulationRuntime;

/// Display sink wrapper counting presented frames.
struct MeteredSink {
    inner: Box<dyn DisplaySink>,
    frames: prometheus::Counter,
}

impl DisplaySink for MeteredSink {
    fn present(&mut self, pixel: u8) {
        self.frames.inc();
        self.inner.present(pixel);
    }
}

/// Builds a fully wired simulation runtime from a validated configuration.
pub struct DatapathBuilder {
    config: PixelbanaConfig,
    source: Option<Box<dyn PixelSource>>,
    sink: Option<Box<dyn DisplaySink>>,
}

impl DatapathBuilder {
    pub fn new(config: PixelbanaConfig) -> Self {
        Self {
            config,
            source: None,
            sink: None,
        }
    }

    /// Overrides the pixel source selected by the configuration.
    pub fn pixel_source(mut self, source: Box<dyn PixelSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Overrides the default trace-output display sink.
    pub fn display_sink(mut self, sink: Box<dyn DisplaySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Wires the datapath and schedules its stages.
    ///
    /// Fails with [`SimError::Wiring`] when the configuration leaves the
    /// interconnect without a downstream target.
    pub fn build(self) -> Result<SimulationRuntime, SimError> {
        let config = self.config;
        if config.memory.banks == 0 {
            return Err(SimError::Wiring(
                "interconnect needs at least one downstream store bank".into(),
            ));
        }

        let metrics = MetricsRecorder::new();
        let mut scheduler = Scheduler::new();
        let frame = FrameRegister::default();
        let data_received = scheduler.signal("data-received");

        let stores: Vec<Rc<RefCell<MemoryStore>>> = (0..config.memory.banks)
            .map(|_| Rc::new(RefCell::new(MemoryStore::new(config.memory.capacity))))
            .collect();
        let targets: Vec<TargetRef> = stores
            .iter()
            .map(|store| Rc::clone(store) as TargetRef)
            .collect();

        let policy = match config.bus.policy {
            RoutingPolicyConfig::Decode => RoutingPolicy::Decode,
            RoutingPolicyConfig::Broadcast => RoutingPolicy::Broadcast,
        };
        let bus: TargetRef = Rc::new(RefCell::new(Interconnect::new(
            config.bus.region_size,
            policy,
            targets,
        )));
        let receiver: TargetRef = Rc::new(RefCell::new(Receiver::new(
            frame.clone(),
            data_received.clone(),
        )));

        let source: Box<dyn PixelSource> = match self.source {
            Some(source) => source,
            None => match config.sim.source {
                SourceMode::Fixed => Box::new(FixedPixelSource::new(config.sim.pixel)),
                SourceMode::Random => Box::new(RandomPixelSource::new(config.sim.seed)),
            },
        };
        let sink: Box<dyn DisplaySink> = match self.sink {
            Some(sink) => sink,
            None => Box::new(TraceSink),
        };
        let sink = Box::new(MeteredSink {
            inner: sink,
            frames: metrics.frames_presented.clone(),
        });

        debug!(
            banks = config.memory.banks,
            capacity = config.memory.capacity,
            region_size = config.bus.region_size,
            ?policy,
            "wiring datapath"
        );

        scheduler.spawn(
            Box::new(CaptureDriver::new(source, Rc::clone(&receiver))),
            0,
        );
        scheduler.spawn(
            Box::new(Processor::new(
                Rc::clone(&bus),
                frame.clone(),
                Some(data_received.clone()),
                Some(data_received),
            )),
            0,
        );
        scheduler.spawn(
            Box::new(OutputConsumer::new(
                bus,
                sink,
                Delay::from_ns(config.consumer.poll_interval_ns),
            )),
            0,
        );

        Ok(SimulationRuntime::new(
            scheduler,
            stores,
            frame,
            config.sim.horizon_ns,
            metrics,
        ))
    }
}
