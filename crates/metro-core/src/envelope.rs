//! Amplitude envelopes and periodic amplitude modulation.
//!
//! An [`Envelope`] maps elapsed time within a buffer to a gain in [0, 1].
//! Time runs from the first sample (`t = 0`) to the last (`t = total`), so
//! fades that start or end at zero hit exactly zero on the edge samples.

use crate::{Lfo, LfoWaveform, SampleBuffer};
use libm::expf;

/// Default edge fade applied to every rendered segment, in seconds.
pub const EDGE_FADE_SECS: f32 = 0.02;

/// Gain curve over the length of a buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Fixed gain.
    Constant(f32),
    /// Straight ramp from `from` to `to` across the whole buffer.
    Linear {
        /// Gain at the first sample.
        from: f32,
        /// Gain at the last sample.
        to: f32,
    },
    /// `exp(-t / tau)`, starting at full gain.
    ExponentialDecay {
        /// Time constant in seconds.
        tau_secs: f32,
    },
    /// Linear attack to full gain, then exponential decay.
    AttackDecay {
        /// Attack time in seconds.
        attack_secs: f32,
        /// Decay time constant in seconds, measured from the attack peak.
        tau_secs: f32,
    },
    /// Trapezoid: fade in, hold at 1, fade out.
    Fade {
        /// Fade-in time in seconds.
        in_secs: f32,
        /// Fade-out time in seconds.
        out_secs: f32,
    },
    /// Piecewise-linear curve through `(progress, gain)` points, progress in
    /// [0, 1]. Points must be sorted by progress; the first and last gains
    /// extend to the buffer edges.
    Breakpoints(Vec<(f32, f32)>),
}

impl Envelope {
    /// Symmetric trapezoid fade.
    pub const fn fade(secs: f32) -> Self {
        Self::Fade {
            in_secs: secs,
            out_secs: secs,
        }
    }

    /// Gain at `t_secs` into a buffer lasting `total_secs`.
    pub fn gain_at(&self, t_secs: f32, total_secs: f32) -> f32 {
        let gain = match self {
            Self::Constant(g) => *g,
            Self::Linear { from, to } => {
                let p = if total_secs > 0.0 {
                    t_secs / total_secs
                } else {
                    0.0
                };
                from + (to - from) * p.clamp(0.0, 1.0)
            }
            Self::ExponentialDecay { tau_secs } => expf(-t_secs / tau_secs.max(1e-4)),
            Self::AttackDecay {
                attack_secs,
                tau_secs,
            } => {
                if t_secs < *attack_secs {
                    t_secs / attack_secs
                } else {
                    expf(-(t_secs - attack_secs) / tau_secs.max(1e-4))
                }
            }
            Self::Fade { in_secs, out_secs } => {
                let rise = if *in_secs > 0.0 { t_secs / in_secs } else { 1.0 };
                let fall = if *out_secs > 0.0 {
                    (total_secs - t_secs) / out_secs
                } else {
                    1.0
                };
                rise.min(fall).min(1.0)
            }
            Self::Breakpoints(points) => {
                let p = if total_secs > 0.0 {
                    (t_secs / total_secs).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                breakpoint_gain(points, p)
            }
        };
        gain.clamp(0.0, 1.0)
    }
}

fn breakpoint_gain(points: &[(f32, f32)], p: f32) -> f32 {
    let Some(&(first_p, first_g)) = points.first() else {
        return 1.0;
    };
    if p <= first_p {
        return first_g;
    }
    for pair in points.windows(2) {
        let (p0, g0) = pair[0];
        let (p1, g1) = pair[1];
        if p <= p1 {
            let span = p1 - p0;
            if span <= f32::EPSILON {
                return g1;
            }
            return g0 + (g1 - g0) * (p - p0) / span;
        }
    }
    points.last().map_or(1.0, |&(_, g)| g)
}

/// Multiply `buffer` by `envelope`.
///
/// ```rust
/// use metro_core::{Envelope, SampleBuffer, envelope_apply};
///
/// let tone = SampleBuffer::from_vec(vec![0.5; 441], 44100.0);
/// let faded = envelope_apply(tone, &Envelope::fade(0.002));
/// assert_eq!(faded.samples()[0], 0.0);
/// assert_eq!(faded.samples()[440], 0.0);
/// assert_eq!(faded.samples()[220], 0.5);
/// ```
pub fn envelope_apply(buffer: SampleBuffer, envelope: &Envelope) -> SampleBuffer {
    envelope_apply_fn(buffer, |t, total| envelope.gain_at(t, total))
}

/// Multiply `buffer` by an arbitrary gain curve `f(t_secs, total_secs)`.
///
/// The curve's output is clamped to [0, 1].
pub fn envelope_apply_fn(
    buffer: SampleBuffer,
    mut f: impl FnMut(f32, f32) -> f32,
) -> SampleBuffer {
    let sr = buffer.sample_rate();
    let total = buffer.len().saturating_sub(1) as f32 / sr;
    let mut n = 0usize;
    buffer.map(|s| {
        let t = n as f32 / sr;
        n += 1;
        s * f(t, total).clamp(0.0, 1.0)
    })
}

/// Zero-ended fade of `secs` at both edges.
pub fn edge_fade(buffer: SampleBuffer, secs: f32) -> SampleBuffer {
    envelope_apply(buffer, &Envelope::fade(secs))
}

/// Periodic amplitude modulation.
///
/// Gain swings between `1 - depth` and 1 at `rate_hz`. `phase` offsets the
/// LFO start (0.0 - 1.0).
pub fn amplitude_modulate(
    buffer: SampleBuffer,
    rate_hz: f32,
    depth: f32,
    waveform: LfoWaveform,
    phase: f32,
) -> SampleBuffer {
    let depth = depth.clamp(0.0, 1.0);
    let mut lfo = Lfo::new(buffer.sample_rate(), rate_hz)
        .with_waveform(waveform)
        .with_phase(phase);
    buffer.map(|s| s * (1.0 - depth * lfo.next_unipolar()))
}
