//! Seeded noise generation with optional band limiting.
//!
//! White noise comes from a 32-bit xorshift generator. Band-limited noise is
//! shaped by two cascaded one-pole highpasses at the lower edge and two
//! cascaded one-pole lowpasses at the upper edge (12 dB/oct skirts), then
//! peak-normalized to the requested amplitude:
//!
//! ```text
//! white ──► HP(low) ──► HP(low) ──► LP(high) ──► LP(high) ──► normalize
//! ```

use crate::{OnePole, OnePoleHighpass, SampleBuffer, samples_for};

/// Spectral shape of a noise layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseBand {
    /// Unfiltered white noise.
    Broadband,
    /// Noise confined to `low_hz..high_hz`.
    Band {
        /// Lower band edge in Hz.
        low_hz: f32,
        /// Upper band edge in Hz.
        high_hz: f32,
    },
}

impl NoiseBand {
    /// Shorthand for [`NoiseBand::Band`].
    pub const fn band(low_hz: f32, high_hz: f32) -> Self {
        Self::Band { low_hz, high_hz }
    }
}

/// Xorshift white-noise source.
///
/// Cheap and deterministic for a given seed; not suitable for anything
/// cryptographic.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    state: u32,
}

impl NoiseSource {
    /// Create a source from a 64-bit seed. Any seed is accepted; the zero
    /// state that would lock xorshift is avoided.
    pub fn new(seed: u64) -> Self {
        let folded = (seed ^ (seed >> 32)) as u32;
        let state = folded.wrapping_mul(0x9E37_79B9) | 1;
        Self { state }
    }

    /// Next sample in [-1, 1].
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as i32 as f32) / (i32::MAX as f32)
    }

    /// Next sample in [0, 1].
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        (self.next_bipolar() + 1.0) * 0.5
    }
}

/// Generate `duration_secs` of noise in `band`, peak-normalized to `amplitude`.
///
/// Band edges are clamped to (0, Nyquist) and swapped if reversed.
///
/// ```rust
/// use metro_core::{NoiseBand, noise};
///
/// let rumble = noise(0.5, 44100.0, NoiseBand::band(40.0, 150.0), 0.3, 7);
/// assert_eq!(rumble.len(), 22050);
/// assert!(rumble.peak() <= 0.3 + 1e-6);
/// ```
pub fn noise(
    duration_secs: f32,
    sample_rate: f32,
    band: NoiseBand,
    amplitude: f32,
    seed: u64,
) -> SampleBuffer {
    let len = samples_for(duration_secs, sample_rate);
    let mut source = NoiseSource::new(seed);
    let white = SampleBuffer::from_fn(len, sample_rate, |_| source.next_bipolar());

    let shaped = match band {
        NoiseBand::Broadband => white,
        NoiseBand::Band { low_hz, high_hz } => {
            let nyquist = sample_rate * 0.5;
            let lo = low_hz.min(high_hz).clamp(1.0, nyquist);
            let hi = low_hz.max(high_hz).clamp(lo, nyquist);
            let (mut hp1, mut hp2) = (
                OnePoleHighpass::new(sample_rate, lo),
                OnePoleHighpass::new(sample_rate, lo),
            );
            let (mut lp1, mut lp2) = (OnePole::new(sample_rate, hi), OnePole::new(sample_rate, hi));
            white.map(|s| {
                let s = hp1.process(s);
                let s = hp2.process(s);
                let s = lp1.process(s);
                lp2.process(s)
            })
        }
    };

    shaped.normalized(amplitude.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_noise() {
        let a = noise(0.1, 44100.0, NoiseBand::Broadband, 0.5, 42);
        let b = noise(0.1, 44100.0, NoiseBand::Broadband, 0.5, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = noise(0.1, 44100.0, NoiseBand::Broadband, 0.5, 1);
        let b = noise(0.1, 44100.0, NoiseBand::Broadband, 0.5, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut src = NoiseSource::new(0);
        let first = src.next_bipolar();
        let second = src.next_bipolar();
        assert_ne!(first, second);
    }

    #[test]
    fn band_limited_noise_is_normalized() {
        let buf = noise(0.25, 44100.0, NoiseBand::band(800.0, 2000.0), 0.2, 9);
        assert!((buf.peak() - 0.2).abs() < 1e-5);
    }

    // Mean absolute first difference tracks high-frequency content.
    fn roughness(buf: &SampleBuffer) -> f32 {
        let s = buf.samples();
        s.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f32>() / s.len() as f32
    }

    #[test]
    fn low_band_is_smoother_than_white() {
        let white = noise(0.5, 44100.0, NoiseBand::Broadband, 0.5, 3);
        let rumble = noise(0.5, 44100.0, NoiseBand::band(40.0, 150.0), 0.5, 3);
        assert!(roughness(&rumble) * 10.0 < roughness(&white));
    }

    #[test]
    fn hiss_band_has_no_offset_and_outpaces_rumble() {
        let rumble = noise(0.5, 44100.0, NoiseBand::band(40.0, 150.0), 0.5, 5);
        let hiss = noise(0.5, 44100.0, NoiseBand::band(4000.0, 8000.0), 0.5, 5);
        let mean = hiss.samples().iter().sum::<f32>() / hiss.len() as f32;
        assert!(mean.abs() < 0.01, "hiss mean {mean}");
        assert!(roughness(&hiss) > 5.0 * roughness(&rumble));
        assert!(hiss.samples().iter().all(|s| s.is_finite()));
    }
}
