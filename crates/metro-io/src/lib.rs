//! Audio output layer for metro-sim.
//!
//! This crate provides:
//!
//! - **Mixing**: [`Mixer`] splices segments with an equal-power cross-fade,
//!   soft-limits, quantizes to 16-bit and slices fixed-size chunks
//! - **Sinks**: the [`PlaybackSink`] trait, with [`CpalSink`] for real devices
//!   and [`MemorySink`] for tests and dry runs
//! - **Pipeline**: [`PlaybackAdapter`] runs a producer thread and drains its
//!   bounded queue into a sink, honouring a [`StopSignal`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use metro_io::{CpalSink, MixerConfig, PlaybackAdapter, StopSignal};
//!
//! let stop = StopSignal::new();
//! let mut sink = CpalSink::new(None);
//! let report = PlaybackAdapter::new(MixerConfig::default()).run(&mut sink, source, &stop)?;
//! println!("played {:.1}s", report.duration_secs());
//! ```

mod cpal_sink;
mod devices;
mod mixer;
mod pipeline;
mod sink;

pub use cpal_sink::CpalSink;
pub use devices::{OutputDevice, default_output_device, list_output_devices};
pub use mixer::{
    CROSSFADE_MS, Channels, Chunk, DEFAULT_CHUNK_FRAMES, DEFAULT_CROSSFADE_MS, Mixer, MixerConfig,
    OutputFormat,
};
pub use pipeline::{DEFAULT_QUEUE_SECS, PlaybackAdapter, PlaybackReport, StopReason, StopSignal};
pub use sink::{MemorySink, PlaybackSink};

/// Error types for audio output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No usable output device; reported before any synthesis starts.
    #[error("No audio output device available: {0}")]
    AudioDeviceUnavailable(String),

    /// The requested output device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// A sink was used out of order (write before open, double close, ...).
    #[error("Sink used out of order: {0}")]
    SinkState(&'static str),

    /// The producer thread panicked.
    #[error("Producer thread panicked")]
    ProducerPanicked,
}

/// Convenience result type for audio output.
pub type Result<T> = std::result::Result<T, Error>;
