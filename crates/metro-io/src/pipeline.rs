//! Producer/consumer playback pipeline.
//!
//! ```text
//!  metro-producer thread                    calling thread
//! ┌────────────────────────┐  bounded   ┌──────────────────┐
//! │ source ──► Mixer ──────┼──queue────►│ sink.write(...)  │
//! │   ▲                    │  (chunks)  │                  │
//! │   └─ StopSignal check  │            │ timeout=underrun │
//! └────────────────────────┘            └──────────────────┘
//! ```
//!
//! The queue is sized in seconds of audio so that it can carry playback
//! through the render of a whole segment: the producer only pulls the next
//! segment after the last chunk of the current one is queued.
//!
//! The producer blocks when the queue is full; the consumer waits up to two
//! chunk periods before counting an underrun and waiting again. A stop request
//! is seen by the producer at the next segment boundary: the segment in flight
//! is mixed and queued in full, the mixer tail is faded out, and the queue
//! hangs up. The consumer drains what is left and the sink is closed once.

use crate::{Chunk, Error, Mixer, MixerConfig, PlaybackSink, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use metro_core::SegmentSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default queue length in seconds of audio.
pub const DEFAULT_QUEUE_SECS: f32 = 2.0;

/// Shared stop request, safe to trigger from a signal handler thread.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Fresh, un-triggered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the pipeline to stop after the current segment.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once a stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The source had nothing more to play (e.g. the run budget was used up).
    SourceExhausted,
    /// A stop was requested.
    Interrupted,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackReport {
    /// Why the run ended.
    pub reason: StopReason,
    /// Segments pulled from the source.
    pub segments: u64,
    /// Chunks written to the sink.
    pub chunks: u64,
    /// Frames written to the sink, final padding included.
    pub frames: u64,
    /// Times the consumer waited two chunk periods without data.
    pub underruns: u64,
    /// Underruns the sink saw on the device side.
    pub device_underruns: u64,
    /// Output sample rate.
    pub sample_rate: u32,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl PlaybackReport {
    /// Audio written, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / f64::from(self.sample_rate.max(1))
    }
}

/// Runs a [`SegmentSource`] through a [`Mixer`] into a [`PlaybackSink`].
#[derive(Debug, Clone)]
pub struct PlaybackAdapter {
    config: MixerConfig,
    queue_secs: f32,
}

impl PlaybackAdapter {
    /// Adapter with the default queue length.
    pub fn new(config: MixerConfig) -> Self {
        Self {
            config,
            queue_secs: DEFAULT_QUEUE_SECS,
        }
    }

    /// Override the queue length in seconds. The queue always holds at
    /// least one chunk.
    pub fn with_queue_secs(mut self, secs: f32) -> Self {
        self.queue_secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self
    }

    /// Mixer settings.
    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Queue length in seconds.
    pub fn queue_secs(&self) -> f32 {
        self.queue_secs
    }

    /// Queue depth in chunks, rounded up to cover [`queue_secs`](Self::queue_secs).
    pub fn queue_depth(&self) -> usize {
        let chunks = (self.queue_secs / self.config.chunk_secs()).ceil();
        (chunks as usize).max(1)
    }

    /// Play `source` on `sink` until it is exhausted or `stop` is triggered.
    ///
    /// The sink is opened before anything is synthesized, so a missing
    /// device fails fast. Once open, it is closed exactly once whatever
    /// happens afterwards.
    pub fn run<K, S>(&self, sink: &mut K, source: S, stop: &StopSignal) -> Result<PlaybackReport>
    where
        K: PlaybackSink + ?Sized,
        S: SegmentSource + Send,
    {
        let started_at = Instant::now();
        let format = self.config.format;
        sink.open(format)?;
        tracing::info!(
            sink = sink.name(),
            sample_rate = format.sample_rate,
            channels = format.channel_count(),
            queue_secs = self.queue_secs,
            queue_depth = self.queue_depth(),
            "playback started"
        );

        let (tx, rx) = bounded::<Chunk>(self.queue_depth());
        let timeout = Duration::from_secs_f32(2.0 * self.config.chunk_secs());
        let channels = u64::from(format.channel_count());
        let config = self.config;

        let outcome = std::thread::scope(|scope| -> Result<(Consumed, Produced)> {
            let producer = std::thread::Builder::new()
                .name("metro-producer".to_string())
                .spawn_scoped(scope, move || produce(source, config, &tx, stop))
                .map_err(|e| Error::Stream(format!("failed to spawn producer: {e}")))?;

            let consumed = consume(&mut *sink, &rx, timeout, channels);
            // Unblocks the producer if the consumer bailed out early.
            drop(rx);
            let produced = producer.join().map_err(|_| Error::ProducerPanicked)?;
            Ok((consumed, produced))
        });

        let closed = sink.close();
        let (consumed, produced) = outcome?;
        if let Some(err) = consumed.error {
            return Err(err);
        }
        closed?;

        let report = PlaybackReport {
            reason: if produced.interrupted {
                StopReason::Interrupted
            } else {
                StopReason::SourceExhausted
            },
            segments: produced.segments,
            chunks: consumed.chunks,
            frames: consumed.frames,
            underruns: consumed.underruns,
            device_underruns: sink.device_underruns(),
            sample_rate: format.sample_rate,
            elapsed: started_at.elapsed(),
        };
        tracing::info!(
            reason = ?report.reason,
            segments = report.segments,
            seconds = report.duration_secs(),
            underruns = report.underruns,
            "playback finished"
        );
        Ok(report)
    }
}

struct Produced {
    segments: u64,
    interrupted: bool,
}

fn produce<S: SegmentSource>(
    mut source: S,
    config: MixerConfig,
    tx: &Sender<Chunk>,
    stop: &StopSignal,
) -> Produced {
    let mut mixer = Mixer::new(config);
    let mut segments = 0;

    let interrupted = loop {
        if stop.is_stop_requested() {
            tracing::info!(segments, "stop requested, flushing");
            break true;
        }
        let Some(segment) = source.next_segment() else {
            break false;
        };
        segments += 1;
        for chunk in mixer.push(&segment) {
            if tx.send(chunk).is_err() {
                tracing::debug!("consumer hung up");
                return Produced {
                    segments,
                    interrupted: stop.is_stop_requested(),
                };
            }
        }
    };

    for chunk in mixer.finish() {
        if tx.send(chunk).is_err() {
            break;
        }
    }
    Produced {
        segments,
        interrupted,
    }
}

struct Consumed {
    chunks: u64,
    frames: u64,
    underruns: u64,
    error: Option<Error>,
}

fn consume<K: PlaybackSink + ?Sized>(
    sink: &mut K,
    rx: &Receiver<Chunk>,
    timeout: Duration,
    channels: u64,
) -> Consumed {
    let mut out = Consumed {
        chunks: 0,
        frames: 0,
        underruns: 0,
        error: None,
    };

    loop {
        match rx.recv_timeout(timeout) {
            Ok(chunk) => {
                if let Err(err) = sink.write(&chunk) {
                    tracing::error!(%err, "sink write failed");
                    out.error = Some(err);
                    break;
                }
                out.chunks += 1;
                out.frames += chunk.len() as u64 / channels;
            }
            Err(RecvTimeoutError::Timeout) if out.chunks == 0 => {
                tracing::debug!("waiting for the first segment");
            }
            Err(RecvTimeoutError::Timeout) => {
                out.underruns += 1;
                tracing::warn!(underruns = out.underruns, "buffer underrun");
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    out
}
