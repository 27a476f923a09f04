//! One-pole filters that carve noise into rumble, contact and hiss bands.
//!
//! ```text
//! lowpass:  y[n] = x[n] + a * (y[n-1] - x[n]),   a = exp(-2π f / fs)
//! highpass: x[n] - lowpass(x[n])
//! ```
//!
//! 6 dB/octave each; [`noise`](crate::noise) cascades two of each per edge.

use crate::flush_denormal;
use core::f32::consts::TAU;
use libm::expf;

/// Pole position for a corner at `freq_hz`, kept inside (0, Nyquist].
fn pole(sample_rate: f32, freq_hz: f32) -> f32 {
    let freq = freq_hz.clamp(1.0e-3, sample_rate * 0.5);
    expf(-TAU * freq / sample_rate)
}

/// One-pole lowpass.
///
/// The pole is fixed at construction and lies in [0, 1), so the filter is
/// always stable.
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    pole: f32,
}

impl OnePole {
    /// Lowpass with its corner at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            state: 0.0,
            pole: pole(sample_rate, freq_hz),
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.pole * (self.state - input));
        self.state
    }
}

/// One-pole highpass, the complement of [`OnePole`].
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    lowpass: OnePole,
}

impl OnePoleHighpass {
    /// Highpass with its corner at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            lowpass: OnePole::new(sample_rate, freq_hz),
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        input - self.lowpass.process(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn tone_gain(mut filter: impl FnMut(f32) -> f32, freq: f32) -> f32 {
        let n = 8820;
        let mut peak = 0.0f32;
        for i in 0..n {
            let y = filter(libm::sinf(TAU * freq * i as f32 / SR));
            if i > n / 2 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn rumble_lowpass_keeps_bass_and_drops_hiss() {
        let mut lp = OnePole::new(SR, 150.0);
        let bass = tone_gain(|x| lp.process(x), 50.0);
        let mut lp = OnePole::new(SR, 150.0);
        let hiss = tone_gain(|x| lp.process(x), 6000.0);
        assert!(bass > 0.9, "bass gain {bass}");
        assert!(hiss < 0.05, "hiss gain {hiss}");
    }

    #[test]
    fn highpass_removes_dc_offset() {
        let mut hp = OnePoleHighpass::new(SR, 200.0);
        let mut out = 1.0;
        for _ in 0..44100 {
            out = hp.process(1.0);
        }
        assert!(out.abs() < 1e-4, "DC should be removed, got {out}");
    }

    #[test]
    fn corner_above_nyquist_is_clamped() {
        let mut lp = OnePole::new(SR, 1.0e6);
        assert!(lp.process(1.0).is_finite());
        assert!(pole(SR, 1.0e6) >= 0.0 && pole(SR, 1.0e6) < 1.0);
    }
}
