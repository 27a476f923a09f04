//! cpal-backed playback sink.
//!
//! ```text
//! write() ──► bounded channel ──► device callback ──► speakers
//!    ▲                                   │
//!    └──────── recycled buffers ◄────────┘
//! ```
//!
//! `write` blocks while the channel is full, which paces the whole pipeline
//! at the device's rate. The callback never allocates: spent buffers go back
//! to the writer for reuse, and an empty channel becomes silence plus a count
//! in an atomic.

use crate::devices::{device_name, find_output_device};
use crate::{Error, OutputFormat, PlaybackSink, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Chunks buffered between `write` and the device callback.
const DEVICE_QUEUE_DEPTH: usize = 4;

struct Running {
    stream: cpal::Stream,
    tx: Sender<Vec<f32>>,
    recycled: Receiver<Vec<f32>>,
    drained: Arc<AtomicBool>,
    format: OutputFormat,
    chunk_secs: f32,
}

/// Plays chunks on a cpal output device.
pub struct CpalSink {
    device_name: Option<String>,
    running: Option<Running>,
    opened: bool,
    underruns: Arc<AtomicU64>,
}

impl CpalSink {
    /// Sink for the named device (case-insensitive substring), or the
    /// default output when `None`.
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            running: None,
            opened: false,
            underruns: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl std::fmt::Debug for CpalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpalSink")
            .field("device_name", &self.device_name)
            .field("open", &self.running.is_some())
            .finish_non_exhaustive()
    }
}

impl PlaybackSink for CpalSink {
    fn name(&self) -> &str {
        self.device_name.as_deref().unwrap_or("default output")
    }

    fn open(&mut self, format: OutputFormat) -> Result<()> {
        if self.opened {
            return Err(Error::SinkState("open called twice"));
        }
        let host = cpal::default_host();
        let device = find_output_device(&host, self.device_name.as_deref())?;
        let name = device_name(&device).unwrap_or_else(|_| "unknown".to_string());

        let stream_config = cpal::StreamConfig {
            channels: format.channel_count(),
            sample_rate: format.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let (tx, rx) = bounded::<Vec<f32>>(DEVICE_QUEUE_DEPTH);
        let (recycle_tx, recycled) = bounded::<Vec<f32>>(DEVICE_QUEUE_DEPTH + 2);
        let drained = Arc::new(AtomicBool::new(false));
        let underruns = Arc::clone(&self.underruns);
        let cb_drained = Arc::clone(&drained);

        let mut current: Vec<f32> = Vec::new();
        let mut pos = 0usize;
        let mut started = false;

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut filled = 0;
                    while filled < data.len() {
                        if pos >= current.len() {
                            match rx.try_recv() {
                                Ok(next) => {
                                    let spent = std::mem::replace(&mut current, next);
                                    let _ = recycle_tx.try_send(spent);
                                    pos = 0;
                                    started = true;
                                    continue;
                                }
                                Err(TryRecvError::Empty) => {
                                    if started {
                                        underruns.fetch_add(1, Ordering::Relaxed);
                                    }
                                    break;
                                }
                                Err(TryRecvError::Disconnected) => {
                                    cb_drained.store(true, Ordering::Release);
                                    break;
                                }
                            }
                        }
                        let n = (current.len() - pos).min(data.len() - filled);
                        data[filled..filled + n].copy_from_slice(&current[pos..pos + n]);
                        pos += n;
                        filled += n;
                    }
                    data[filled..].fill(0.0);
                },
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            device = %name,
            channels = format.channel_count(),
            sample_rate = format.sample_rate,
            "output stream started"
        );

        self.opened = true;
        self.running = Some(Running {
            stream,
            tx,
            recycled,
            drained,
            format,
            chunk_secs: 0.0,
        });
        Ok(())
    }

    fn write(&mut self, chunk: &[i16]) -> Result<()> {
        let running = self
            .running
            .as_mut()
            .ok_or(Error::SinkState("write on a sink that is not open"))?;

        let mut buf = running.recycled.try_recv().unwrap_or_default();
        buf.clear();
        buf.extend(chunk.iter().map(|&s| f32::from(s) / 32768.0));
        let frames = chunk.len() / usize::from(running.format.channel_count());
        let secs = frames as f32 / running.format.sample_rate as f32;
        running.chunk_secs = running.chunk_secs.max(secs);
        running
            .tx
            .send(buf)
            .map_err(|_| Error::Stream("device callback hung up".to_string()))
    }

    fn close(&mut self) -> Result<()> {
        let running = self
            .running
            .take()
            .ok_or(Error::SinkState("close on a sink that is not open"))?;
        let Running {
            stream,
            tx,
            drained,
            chunk_secs,
            ..
        } = running;

        // Hang up and let the callback play out what is queued.
        drop(tx);
        let budget = Duration::from_secs_f32(chunk_secs * (DEVICE_QUEUE_DEPTH + 2) as f32 + 1.0);
        let deadline = Instant::now() + budget;
        while !drained.load(Ordering::Acquire) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        if !drained.load(Ordering::Acquire) {
            tracing::warn!("output did not drain before close");
        }

        if let Err(e) = stream.pause() {
            tracing::debug!(error = %e, "pause on close failed");
        }
        drop(stream);
        tracing::info!(
            device_underruns = self.underruns.load(Ordering::Relaxed),
            "output stream closed"
        );
        Ok(())
    }

    fn device_underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}
