//! Segment splicing and chunking.
//!
//! The mixer turns a stream of independently rendered segments into fixed-size
//! chunks of interleaved 16-bit PCM:
//!
//! ```text
//! segment ──► cross-fade with held tail ──► soft limit ──► quantize ──► interleave ──► chunks
//!                                   │
//!                                   └── last `crossfade` samples held back for the next splice
//! ```
//!
//! Each splice overlaps the held tail of the previous segment with the head of
//! the next using equal-power gains, so the output never steps at a segment
//! boundary. The overlap shortens the stream by one window per splice.

use metro_core::{
    LIMIT_THRESHOLD, ParamRange, SAMPLE_RATE, SampleBuffer, equal_power_gains, quantize_i16,
    samples_for, soft_limit,
};

/// Allowed cross-fade window in milliseconds.
pub const CROSSFADE_MS: ParamRange = ParamRange::new("crossfade_ms", 50.0, 150.0);
/// Default cross-fade window in milliseconds.
pub const DEFAULT_CROSSFADE_MS: f32 = 80.0;
/// Default chunk size in frames.
pub const DEFAULT_CHUNK_FRAMES: usize = 1024;

/// One chunk of interleaved 16-bit samples, `frames × channels` long.
pub type Chunk = Vec<i16>;

/// Output channel layout. Stereo duplicates the mono mix into both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channels {
    /// One channel.
    Mono,
    /// Two identical channels.
    #[default]
    Stereo,
}

impl Channels {
    /// Channel count.
    pub fn count(self) -> u16 {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }
}

/// PCM format handed to a sink. Samples are always signed 16-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel layout.
    pub channels: Channels,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: Channels::Stereo,
        }
    }
}

impl OutputFormat {
    /// Channel count.
    pub fn channel_count(&self) -> u16 {
        self.channels.count()
    }

    /// Bits per sample; fixed at 16.
    pub fn bits_per_sample(&self) -> u16 {
        16
    }
}

/// Mixer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfig {
    /// Cross-fade window in milliseconds, clamped to [`CROSSFADE_MS`].
    pub crossfade_ms: f32,
    /// Frames per emitted chunk.
    pub chunk_frames: usize,
    /// Output format.
    pub format: OutputFormat,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            crossfade_ms: DEFAULT_CROSSFADE_MS,
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            format: OutputFormat::default(),
        }
    }
}

impl MixerConfig {
    /// Duration of one chunk in seconds.
    pub fn chunk_secs(&self) -> f32 {
        self.chunk_frames.max(1) as f32 / self.format.sample_rate.max(1) as f32
    }

    /// Samples each splice overlaps at the output rate, after clamping.
    ///
    /// A journey budgeted with this overlap plays at least its budget.
    pub fn crossfade_len(&self) -> usize {
        let secs = CROSSFADE_MS.clamp(self.crossfade_ms) / 1000.0;
        samples_for(secs, self.format.sample_rate as f32).max(1)
    }
}

/// Streaming segment splicer.
///
/// ```rust
/// use metro_core::SampleBuffer;
/// use metro_io::{Mixer, MixerConfig};
///
/// let mut mixer = Mixer::new(MixerConfig::default());
/// let mut chunks = mixer.push(&SampleBuffer::silence(1.0, 44100.0));
/// chunks.extend(mixer.finish());
/// assert!(chunks.iter().all(|c| c.len() == 1024 * 2));
/// ```
#[derive(Debug, Clone)]
pub struct Mixer {
    config: MixerConfig,
    fade_len: usize,
    chunk_len: usize,
    tail: Vec<f32>,
    pending: Vec<i16>,
    segments: u64,
    frames: u64,
}

impl Mixer {
    /// Create a mixer. Out-of-range settings are clamped.
    pub fn new(config: MixerConfig) -> Self {
        let config = MixerConfig {
            crossfade_ms: CROSSFADE_MS.clamp(config.crossfade_ms),
            chunk_frames: config.chunk_frames.max(1),
            format: config.format,
        };
        let fade_len = config.crossfade_len();
        let chunk_len = config.chunk_frames * usize::from(config.format.channel_count());
        Self {
            config,
            fade_len,
            chunk_len,
            tail: Vec::with_capacity(fade_len),
            pending: Vec::with_capacity(chunk_len),
            segments: 0,
            frames: 0,
        }
    }

    /// Effective configuration after clamping.
    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Cross-fade window in samples.
    pub fn crossfade_len(&self) -> usize {
        self.fade_len
    }

    /// Segments pushed so far.
    pub fn segments(&self) -> u64 {
        self.segments
    }

    /// Frames emitted so far, padding included.
    pub fn frames_emitted(&self) -> u64 {
        self.frames
    }

    /// Splice in a segment and return every chunk that is now complete.
    pub fn push(&mut self, segment: &SampleBuffer) -> Vec<Chunk> {
        let incoming = segment.samples();
        if segment.sample_rate() != self.config.format.sample_rate as f32 {
            tracing::debug!(
                segment_rate = segment.sample_rate(),
                output_rate = self.config.format.sample_rate,
                "segment sample rate differs from output"
            );
        }

        let mut joined = std::mem::take(&mut self.tail);
        let overlap = joined.len().min(incoming.len()).min(self.fade_len);
        let start = joined.len() - overlap;
        for (i, (held, &next)) in joined[start..].iter_mut().zip(incoming).enumerate() {
            let t = (i + 1) as f32 / (overlap + 1) as f32;
            let (fade_out, fade_in) = equal_power_gains(t);
            *held = *held * fade_out + next * fade_in;
        }
        joined.extend_from_slice(&incoming[overlap..]);

        let hold = joined.len().min(self.fade_len);
        self.tail = joined.split_off(joined.len() - hold);
        self.segments += 1;
        self.emit(&joined)
    }

    /// Fade out the held tail, pad the last chunk with silence and return
    /// what is left. The mixer is empty afterwards and can be reused.
    pub fn finish(&mut self) -> Vec<Chunk> {
        let mut tail = std::mem::take(&mut self.tail);
        let n = tail.len();
        for (i, s) in tail.iter_mut().enumerate() {
            let (fade_out, _) = equal_power_gains((i + 1) as f32 / n as f32);
            *s *= fade_out;
        }
        let mut chunks = self.emit(&tail);
        if !self.pending.is_empty() {
            let padding = self.chunk_len - self.pending.len();
            self.pending.resize(self.chunk_len, 0);
            self.frames += (padding / usize::from(self.config.format.channel_count())) as u64;
            chunks.push(std::mem::replace(
                &mut self.pending,
                Vec::with_capacity(self.chunk_len),
            ));
        }
        chunks
    }

    fn emit(&mut self, samples: &[f32]) -> Vec<Chunk> {
        let channels = usize::from(self.config.format.channel_count());
        let mut chunks = Vec::new();
        for &s in samples {
            let q = quantize_i16(soft_limit(s, LIMIT_THRESHOLD));
            for _ in 0..channels {
                self.pending.push(q);
            }
            self.frames += 1;
            if self.pending.len() >= self.chunk_len {
                chunks.push(std::mem::replace(
                    &mut self.pending,
                    Vec::with_capacity(self.chunk_len),
                ));
            }
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn mono() -> MixerConfig {
        MixerConfig {
            format: OutputFormat {
                sample_rate: SAMPLE_RATE,
                channels: Channels::Mono,
            },
            ..MixerConfig::default()
        }
    }

    fn flatten(chunks: &[Chunk]) -> Vec<i16> {
        chunks.iter().flatten().copied().collect()
    }

    #[test]
    fn crossfade_is_clamped() {
        let mixer = Mixer::new(MixerConfig {
            crossfade_ms: 10.0,
            ..MixerConfig::default()
        });
        assert_eq!(mixer.config().crossfade_ms, 50.0);
        assert_eq!(mixer.crossfade_len(), 2205);
    }

    #[test]
    fn splice_between_opposite_levels_is_smooth() {
        let mut mixer = Mixer::new(mono());
        let mut chunks = mixer.push(&SampleBuffer::from_vec(vec![0.5; 44100], SR));
        chunks.extend(mixer.push(&SampleBuffer::from_vec(vec![-0.5; 44100], SR)));
        chunks.extend(mixer.finish());

        let out = flatten(&chunks);
        let max_step = out
            .windows(2)
            .map(|w| (f32::from(w[1]) - f32::from(w[0])).abs() / 32767.0)
            .fold(0.0f32, f32::max);
        assert!(max_step < 0.01, "max step {max_step}");
    }

    #[test]
    fn overlap_shortens_by_one_window_per_splice() {
        let mut mixer = Mixer::new(mono());
        let fade = mixer.crossfade_len() as u64;
        let mut chunks = mixer.push(&SampleBuffer::silence(1.0, SR));
        chunks.extend(mixer.push(&SampleBuffer::silence(1.0, SR)));
        let before_padding = 2 * 44100 - fade;
        chunks.extend(mixer.finish());
        let frames = mixer.frames_emitted();
        assert!(frames >= before_padding && frames < before_padding + 1024);
        assert_eq!(frames as usize, flatten(&chunks).len());
    }

    #[test]
    fn config_and_mixer_agree_on_the_window() {
        for crossfade_ms in [10.0, 50.0, 80.0, 100.0, 400.0] {
            let config = MixerConfig {
                crossfade_ms,
                ..mono()
            };
            assert_eq!(config.crossfade_len(), Mixer::new(config).crossfade_len());
        }
        assert_eq!(MixerConfig::default().crossfade_len(), 3528);
    }

    #[test]
    fn chunks_are_full_and_stereo_is_duplicated() {
        let mut mixer = Mixer::new(MixerConfig::default());
        let tone = SampleBuffer::from_fn(5000, SR, |n| 0.3 * (n as f32 * 0.01).sin());
        let mut chunks = mixer.push(&tone);
        chunks.extend(mixer.finish());
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert_eq!(chunk.len(), 2048);
            assert!(chunk.chunks(2).all(|f| f[0] == f[1]));
        }
    }

    #[test]
    fn short_segments_are_carried_into_the_next_chunk() {
        let mut mixer = Mixer::new(mono());
        for _ in 0..3 {
            assert!(mixer.push(&SampleBuffer::silence(0.01, SR)).is_empty());
        }
        assert_eq!(mixer.finish().len(), 1);
    }

    #[test]
    fn finish_fades_tail_to_zero() {
        let mut mixer = Mixer::new(mono());
        let mut chunks = mixer.push(&SampleBuffer::from_vec(vec![0.5; 20000], SR));
        chunks.extend(mixer.finish());
        let out = flatten(&chunks);
        let last_audio = 20000 - 1;
        assert_eq!(out[last_audio], 0);
        assert!(out[last_audio + 1..].iter().all(|&s| s == 0));
    }

    #[test]
    fn loud_input_is_limited_without_wraparound() {
        let mut mixer = Mixer::new(mono());
        let mut chunks = mixer.push(&SampleBuffer::from_vec(vec![3.0, -3.0, 1.5, -1.5], SR));
        chunks.extend(mixer.finish());
        let out = flatten(&chunks);
        assert!(out[0] > 0 && out[1] < 0 && out[2] > 0);
    }
}
