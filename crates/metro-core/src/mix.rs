//! Layer summation with soft limiting.

use crate::{SampleBuffer, samples_for, soft_limit};

/// Accumulates layers into a fixed-length buffer.
///
/// Layers are added with a gain and an optional start offset; anything
/// running past the end is truncated. [`LayerMix::finish`] soft-limits the
/// sum, which is the only clipping applied to a composed segment.
///
/// ```rust
/// use metro_core::{LayerMix, NoiseBand, noise};
///
/// let sr = 44100.0;
/// let mut mix = LayerMix::new(1.0, sr);
/// mix.add(&noise(1.0, sr, NoiseBand::band(40.0, 150.0), 0.6, 1), 1.0);
/// mix.add(&noise(1.0, sr, NoiseBand::band(800.0, 2000.0), 0.6, 2), 1.0);
/// let out = mix.finish(0.9);
/// assert_eq!(out.len(), 44100);
/// assert!(out.peak() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LayerMix {
    acc: Vec<f32>,
    sample_rate: f32,
}

impl LayerMix {
    /// An empty mix lasting `duration_secs`.
    pub fn new(duration_secs: f32, sample_rate: f32) -> Self {
        Self::with_len(samples_for(duration_secs, sample_rate), sample_rate)
    }

    /// An empty mix of exactly `len` samples.
    pub fn with_len(len: usize, sample_rate: f32) -> Self {
        Self {
            acc: vec![0.0; len],
            sample_rate,
        }
    }

    /// Length in samples.
    pub fn len(&self) -> usize {
        self.acc.len()
    }

    /// True when the mix has zero length.
    pub fn is_empty(&self) -> bool {
        self.acc.is_empty()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Add `layer` from the first sample.
    pub fn add(&mut self, layer: &SampleBuffer, gain: f32) -> &mut Self {
        self.add_at(layer, gain, 0)
    }

    /// Add `layer` starting at sample `offset`.
    pub fn add_at(&mut self, layer: &SampleBuffer, gain: f32, offset: usize) -> &mut Self {
        if let Some(dest) = self.acc.get_mut(offset..) {
            for (d, &s) in dest.iter_mut().zip(layer.samples()) {
                *d += s * gain;
            }
        }
        self
    }

    /// Add `layer` starting at `offset_secs`.
    pub fn add_at_secs(&mut self, layer: &SampleBuffer, gain: f32, offset_secs: f32) -> &mut Self {
        let offset = samples_for(offset_secs, self.sample_rate);
        self.add_at(layer, gain, offset)
    }

    /// Soft-limit the sum at `threshold` and hand back the buffer.
    pub fn finish(self, threshold: f32) -> SampleBuffer {
        SampleBuffer::from_vec(self.acc, self.sample_rate).map(|s| soft_limit(s, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_layers_land_in_place() {
        let one = SampleBuffer::from_vec(vec![0.25; 4], 44100.0);
        let mut mix = LayerMix::with_len(10, 44100.0);
        mix.add_at(&one, 1.0, 3).add_at(&one, 2.0, 8);
        let out = mix.finish(0.9);
        assert_eq!(
            out.samples(),
            &[0.0, 0.0, 0.0, 0.25, 0.25, 0.25, 0.25, 0.0, 0.5, 0.5]
        );
    }

    #[test]
    fn offset_past_end_is_ignored() {
        let one = SampleBuffer::from_vec(vec![0.25; 4], 44100.0);
        let mut mix = LayerMix::with_len(4, 44100.0);
        mix.add_at(&one, 1.0, 100);
        assert_eq!(mix.finish(0.9).peak(), 0.0);
    }

    #[test]
    fn loud_sums_are_limited() {
        let loud = SampleBuffer::from_vec(vec![0.8; 16], 44100.0);
        let mut mix = LayerMix::with_len(16, 44100.0);
        mix.add(&loud, 1.0).add(&loud, 1.0).add(&loud, 1.0);
        let out = mix.finish(0.9);
        assert!(out.samples().iter().all(|s| *s > 0.9 && *s <= 1.0));
    }
}
