//! Frequency sweeps and harmonic stacks by phase accumulation.
//!
//! Instantaneous frequency follows a [`SweepShape`] from `start_hz` to
//! `end_hz` across the buffer. Phase is integrated per sample, so there are
//! no discontinuities even though the frequency changes every sample:
//!
//! ```text
//! phase[n+1] = phase[n] + f(n / len) / sample_rate
//! ```

use crate::{SampleBuffer, samples_for};
use core::f32::consts::TAU;
use libm::{powf, sinf};

/// Trajectory of a sweep's instantaneous frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepShape {
    /// Frequency moves by equal hertz per second.
    #[default]
    Linear,
    /// Frequency moves by equal ratios per second (constant rate in octaves).
    Exponential,
}

impl SweepShape {
    /// Frequency at `progress` in [0, 1] between `start_hz` and `end_hz`.
    ///
    /// Exponential sweeps need positive endpoints; both are floored at 1 Hz.
    #[inline]
    pub fn frequency_at(self, start_hz: f32, end_hz: f32, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => start_hz + (end_hz - start_hz) * t,
            Self::Exponential => {
                let f0 = start_hz.max(1.0);
                let f1 = end_hz.max(1.0);
                f0 * powf(f1 / f0, t)
            }
        }
    }
}

/// Sine sweep from `start_hz` to `end_hz`.
///
/// ```rust
/// use metro_core::{SweepShape, sweep};
///
/// let rise = sweep(1.0, 44100.0, 250.0, 850.0, SweepShape::Exponential, 0.5);
/// assert_eq!(rise.len(), 44100);
/// assert!(rise.peak() <= 0.5);
/// ```
pub fn sweep(
    duration_secs: f32,
    sample_rate: f32,
    start_hz: f32,
    end_hz: f32,
    shape: SweepShape,
    amplitude: f32,
) -> SampleBuffer {
    harmonic_sweep(
        duration_secs,
        sample_rate,
        start_hz,
        end_hz,
        shape,
        &[1.0],
        amplitude,
    )
}

/// Steady fundamental plus weighted overtones.
///
/// `gains[k]` weights harmonic `k + 1`. See [`harmonic_sweep`].
pub fn harmonic_stack(
    duration_secs: f32,
    sample_rate: f32,
    fundamental_hz: f32,
    gains: &[f32],
    amplitude: f32,
) -> SampleBuffer {
    harmonic_sweep(
        duration_secs,
        sample_rate,
        fundamental_hz,
        fundamental_hz,
        SweepShape::Linear,
        gains,
        amplitude,
    )
}

/// Swept fundamental plus weighted overtones.
///
/// `gains[k]` weights harmonic `k + 1`. The sum is divided by the total
/// absolute gain so the peak never exceeds `amplitude`. Partials above
/// Nyquist are muted sample by sample.
pub fn harmonic_sweep(
    duration_secs: f32,
    sample_rate: f32,
    start_hz: f32,
    end_hz: f32,
    shape: SweepShape,
    gains: &[f32],
    amplitude: f32,
) -> SampleBuffer {
    let len = samples_for(duration_secs, sample_rate);
    let norm: f32 = gains.iter().map(|g| g.abs()).sum();
    if len == 0 || norm <= f32::EPSILON {
        return SampleBuffer::silence(duration_secs, sample_rate);
    }
    let scale = amplitude / norm;
    let nyquist = sample_rate * 0.5;
    let mut phase = 0.0f32;

    SampleBuffer::from_fn(len, sample_rate, |n| {
        let freq = shape.frequency_at(start_hz, end_hz, n as f32 / len as f32);
        let mut acc = 0.0;
        for (k, &g) in gains.iter().enumerate() {
            let harmonic = (k + 1) as f32;
            if freq * harmonic >= nyquist {
                break;
            }
            acc += g * sinf(TAU * (phase * harmonic).fract());
        }
        phase = (phase + freq / sample_rate).fract();
        acc * scale
    })
}
