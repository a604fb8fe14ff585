//! # pixelbana-datapath
//!
//! The six components of the simulated video datapath: capture driver,
//! receiver, processor, interconnect, memory store, and output consumer.
//! Initiating stages are scheduler processes; targets implement the
//! blocking transport contract from `pixelbana-core`.
//!
//! Data flows one frame byte at a time:
//! capture driver → receiver (latch + completion signal) → processor →
//! interconnect → memory store, with the output consumer polling the store
//! through the interconnect and handing retrieved bytes to a display sink.

pub mod bus;
pub mod capture;
pub mod consumer;
pub mod processor;
pub mod receiver;
pub mod store;

pub use bus::{Interconnect, RoutingPolicy};
pub use capture::{CaptureDriver, FixedPixelSource, PixelSource, RandomPixelSource};
pub use consumer::{DisplaySink, OutputConsumer, TraceSink};
pub use processor::Processor;
pub use receiver::{FrameRegister, Receiver};
pub use store::MemoryStore;

/// Address every stage of the reference datapath uses for the frame byte.
pub const FRAME_ADDRESS: u64 = 0;
