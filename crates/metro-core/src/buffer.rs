//! Mono sample buffers at the fixed output rate.

use crate::math::{LIMIT_THRESHOLD, soft_limit};

/// Output sample rate in Hz. Every buffer in the pipeline runs at this rate.
pub const SAMPLE_RATE: u32 = 44_100;

/// Number of samples that cover `duration_secs` at `sample_rate`.
///
/// Negative and non-finite durations yield zero samples.
///
/// ```rust
/// use metro_core::samples_for;
///
/// assert_eq!(samples_for(1.0, 44100.0), 44100);
/// assert_eq!(samples_for(0.18, 44100.0), 7938);
/// assert_eq!(samples_for(-2.0, 44100.0), 0);
/// ```
#[inline]
pub fn samples_for(duration_secs: f32, sample_rate: f32) -> usize {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return 0;
    }
    (f64::from(duration_secs) * f64::from(sample_rate)).round() as usize
}

/// An ordered run of normalized mono samples.
///
/// Samples are `f32` in [-1.0, 1.0]. Transformations consume the buffer and
/// hand back a new one, so a buffer is never mutated after it leaves its
/// producer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: f32,
}

impl SampleBuffer {
    /// Wrap raw samples.
    pub fn from_vec(samples: Vec<f32>, sample_rate: f32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A buffer of `duration_secs` of digital silence.
    pub fn silence(duration_secs: f32, sample_rate: f32) -> Self {
        Self::from_vec(vec![0.0; samples_for(duration_secs, sample_rate)], sample_rate)
    }

    /// Build `len` samples from a per-index generator.
    pub fn from_fn(len: usize, sample_rate: f32, f: impl FnMut(usize) -> f32) -> Self {
        Self::from_vec((0..len).map(f).collect(), sample_rate)
    }

    /// Concatenate buffers end to end.
    ///
    /// The sample rate is taken from the first part; an empty slice yields an
    /// empty buffer at [`SAMPLE_RATE`].
    pub fn concat(parts: &[SampleBuffer]) -> Self {
        let sample_rate = parts
            .first()
            .map(|p| p.sample_rate)
            .unwrap_or(SAMPLE_RATE as f32);
        let total = parts.iter().map(SampleBuffer::len).sum();
        let mut samples = Vec::with_capacity(total);
        for part in parts {
            samples.extend_from_slice(&part.samples);
        }
        Self::from_vec(samples, sample_rate)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate
    }

    /// Read-only view of the samples.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Root-mean-square level.
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| f64::from(s * s)).sum();
        (sum / self.samples.len() as f64).sqrt() as f32
    }

    /// Apply `f` to every sample.
    pub fn map(mut self, mut f: impl FnMut(f32) -> f32) -> Self {
        for s in &mut self.samples {
            *s = f(*s);
        }
        self
    }

    /// Multiply every sample by `gain`.
    pub fn scaled(self, gain: f32) -> Self {
        self.map(|s| s * gain)
    }

    /// Scale so the peak equals `amplitude`. Silent buffers are returned as is.
    pub fn normalized(self, amplitude: f32) -> Self {
        let peak = self.peak();
        if peak <= f32::EPSILON {
            return self;
        }
        self.scaled(amplitude / peak)
    }

    /// Run every sample through [`soft_limit`] at the default threshold.
    pub fn limited(self) -> Self {
        self.map(|s| soft_limit(s, LIMIT_THRESHOLD))
    }

    /// Copy out `len` samples starting at `start`, truncated to the buffer end.
    pub fn slice(&self, start: usize, len: usize) -> Self {
        let start = start.min(self.samples.len());
        let end = start.saturating_add(len).min(self.samples.len());
        Self::from_vec(self.samples[start..end].to_vec(), self.sample_rate)
    }
}
