//! Percussive clicks: rail joints, relays, latches.
//!
//! A click is a short kernel (noise burst or decaying sine) stamped into a
//! buffer at regular or explicit times. Each stamp gets a small, seeded
//! amplitude variation so long runs do not sound machine-gunned.

use crate::{NoiseSource, SampleBuffer, samples_for};
use core::f32::consts::TAU;
use libm::{expf, sinf};

/// Kernel used for each click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickShape {
    /// Bright broadband tick.
    Impulse {
        /// Decay time constant in seconds.
        decay_secs: f32,
    },
    /// Low resonant knock.
    Thump {
        /// Resonant frequency in Hz.
        freq_hz: f32,
        /// Decay time constant in seconds.
        decay_secs: f32,
    },
    /// Two ticks in quick succession, like a bogie's axle pair crossing a joint.
    Double {
        /// Gap between the ticks in seconds.
        spacing_secs: f32,
        /// Decay time constant of each tick.
        decay_secs: f32,
    },
}

/// Spacing between successive clicks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickInterval {
    /// Constant period in seconds.
    Fixed(f32),
    /// Period implied by covering `spacing_m` at `speed_kmh`.
    SpeedScaled {
        /// Distance between click sources in metres (e.g. rail length).
        spacing_m: f32,
        /// Vehicle speed in km/h.
        speed_kmh: f32,
    },
}

impl ClickInterval {
    /// Period in seconds, or `None` when there is no motion to click at.
    ///
    /// ```rust
    /// use metro_core::ClickInterval;
    ///
    /// let joints = ClickInterval::SpeedScaled { spacing_m: 18.0, speed_kmh: 72.0 };
    /// assert!((joints.period_secs().unwrap() - 0.9).abs() < 1e-5);
    /// ```
    pub fn period_secs(&self) -> Option<f32> {
        let period = match *self {
            Self::Fixed(secs) => secs,
            Self::SpeedScaled {
                spacing_m,
                speed_kmh,
            } => {
                let mps = speed_kmh / 3.6;
                if mps <= 0.1 {
                    return None;
                }
                spacing_m / mps
            }
        };
        (period.is_finite() && period > 1e-3).then_some(period)
    }
}

/// Clicks repeating at `interval`, the first one half a period in.
pub fn periodic_click(
    duration_secs: f32,
    sample_rate: f32,
    interval: ClickInterval,
    shape: ClickShape,
    amplitude: f32,
    seed: u64,
) -> SampleBuffer {
    let Some(period) = interval.period_secs() else {
        return SampleBuffer::silence(duration_secs, sample_rate);
    };
    let mut times = Vec::new();
    let mut t = period * 0.5;
    while t < duration_secs {
        times.push(t);
        t += period;
    }
    clicks_at(duration_secs, sample_rate, &times, shape, amplitude, seed)
}

/// Clicks at explicit times (seconds from the buffer start).
///
/// Times outside the buffer are ignored; kernels running past the end are
/// truncated.
pub fn clicks_at(
    duration_secs: f32,
    sample_rate: f32,
    times: &[f32],
    shape: ClickShape,
    amplitude: f32,
    seed: u64,
) -> SampleBuffer {
    let len = samples_for(duration_secs, sample_rate);
    let mut out = vec![0.0f32; len];
    let mut rng = NoiseSource::new(seed);

    for &time in times {
        if !(0.0..duration_secs).contains(&time) {
            continue;
        }
        let gain = amplitude * (0.85 + 0.15 * rng.next_unipolar());
        let start = samples_for(time, sample_rate);
        match shape {
            ClickShape::Impulse { decay_secs } => {
                stamp_tick(&mut out, start, sample_rate, decay_secs, gain, &mut rng);
            }
            ClickShape::Thump {
                freq_hz,
                decay_secs,
            } => stamp_thump(&mut out, start, sample_rate, freq_hz, decay_secs, gain, &mut rng),
            ClickShape::Double {
                spacing_secs,
                decay_secs,
            } => {
                stamp_tick(&mut out, start, sample_rate, decay_secs, gain, &mut rng);
                let second = start + samples_for(spacing_secs, sample_rate);
                stamp_tick(&mut out, second, sample_rate, decay_secs, gain * 0.8, &mut rng);
            }
        }
    }

    SampleBuffer::from_vec(out, sample_rate).map(|s| s.clamp(-1.0, 1.0))
}

const ATTACK_SECS: f32 = 0.0005;

fn kernel_len(decay_secs: f32, sample_rate: f32) -> usize {
    samples_for(decay_secs.max(1e-4) * 6.0 + ATTACK_SECS, sample_rate)
}

fn kernel_gain(n: usize, sample_rate: f32, decay_secs: f32) -> f32 {
    let t = n as f32 / sample_rate;
    if t < ATTACK_SECS {
        t / ATTACK_SECS
    } else {
        expf(-(t - ATTACK_SECS) / decay_secs.max(1e-4))
    }
}

fn stamp_tick(
    out: &mut [f32],
    start: usize,
    sample_rate: f32,
    decay_secs: f32,
    gain: f32,
    rng: &mut NoiseSource,
) {
    let len = kernel_len(decay_secs, sample_rate);
    for (n, slot) in out.iter_mut().skip(start).take(len).enumerate() {
        *slot += rng.next_bipolar() * gain * kernel_gain(n, sample_rate, decay_secs);
    }
}

fn stamp_thump(
    out: &mut [f32],
    start: usize,
    sample_rate: f32,
    freq_hz: f32,
    decay_secs: f32,
    gain: f32,
    rng: &mut NoiseSource,
) {
    let len = kernel_len(decay_secs, sample_rate);
    for (n, slot) in out.iter_mut().skip(start).take(len).enumerate() {
        let t = n as f32 / sample_rate;
        let body = 0.8 * sinf(TAU * freq_hz * t) + 0.2 * rng.next_bipolar();
        *slot += body * gain * kernel_gain(n, sample_rate, decay_secs);
    }
}
