//! Metro Core - signal primitives for procedural transit soundscapes
//!
//! Every primitive is a pure function of duration, sample rate and numeric
//! parameters that returns a fresh [`SampleBuffer`]. Randomness is always
//! seeded, so the same arguments produce the same samples.
//!
//! # Generators
//!
//! - [`noise`] - White or band-limited noise ([`NoiseBand`])
//! - [`sweep`] / [`harmonic_sweep`] - Linear or exponential frequency sweeps ([`SweepShape`])
//! - [`harmonic_stack`] - Fundamental plus weighted overtones
//! - [`pwm`] - Inverter-style PWM carrier in the 3–8 kHz band
//! - [`periodic_click`] / [`clicks_at`] - Rail joints, relays, latches
//!
//! # Shaping
//!
//! - [`Envelope`] with [`envelope_apply`] / [`envelope_apply_fn`]
//! - [`amplitude_modulate`] - Periodic wobble from an [`Lfo`]
//! - [`LayerMix`] - Summation with soft limiting ([`soft_limit`])
//!
//! # Building Blocks
//!
//! - [`OnePole`] / [`OnePoleHighpass`] - 6 dB/oct filters
//! - [`Lfo`] - Low-frequency oscillator (4 waveforms)
//! - [`NoiseSource`] - Xorshift generator
//! - [`ParamRange`] - Clamp-and-log parameter bounds
//! - [`SegmentSource`] - Pull interface the playback pipeline consumes
//!
//! # Example
//!
//! ```rust
//! use metro_core::{Envelope, LayerMix, NoiseBand, SweepShape, envelope_apply, noise, sweep};
//!
//! let sr = 44100.0;
//! let rumble = noise(2.0, sr, NoiseBand::band(40.0, 150.0), 0.3, 1);
//! let motor = sweep(2.0, sr, 250.0, 850.0, SweepShape::Exponential, 0.2);
//!
//! let mut mix = LayerMix::new(2.0, sr);
//! mix.add(&rumble, 1.0).add(&motor, 1.0);
//! let segment = envelope_apply(mix.finish(0.9), &Envelope::fade(0.02));
//! assert_eq!(segment.samples()[0], 0.0);
//! ```

pub mod buffer;
pub mod click;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod mix;
pub mod noise;
pub mod one_pole;
pub mod param;
pub mod pwm;
pub mod source;
pub mod sweep;

pub use buffer::{SAMPLE_RATE, SampleBuffer, samples_for};
pub use click::{ClickInterval, ClickShape, clicks_at, periodic_click};
pub use envelope::{
    EDGE_FADE_SECS, Envelope, amplitude_modulate, edge_fade, envelope_apply, envelope_apply_fn,
};
pub use lfo::{Lfo, LfoWaveform};
pub use math::{LIMIT_THRESHOLD, equal_power_gains, flush_denormal, quantize_i16, soft_limit};
pub use mix::LayerMix;
pub use noise::{NoiseBand, NoiseSource, noise};
pub use one_pole::{OnePole, OnePoleHighpass};
pub use param::ParamRange;
pub use pwm::{PWM_CARRIER, PwmModulation, poly_blep, pwm};
pub use source::{SegmentSource, Segments};
pub use sweep::{SweepShape, harmonic_stack, harmonic_sweep, sweep};
