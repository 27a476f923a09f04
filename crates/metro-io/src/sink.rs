//! Playback sinks.
//!
//! A sink receives interleaved 16-bit chunks on the consumer side of the
//! pipeline. Its lifecycle is strict: `open` once, any number of `write`s,
//! `close` once.

use crate::{Error, OutputFormat, Result};

/// Destination for mixed PCM chunks.
///
/// `write` may block; a real-time sink uses that to pace the producer.
pub trait PlaybackSink {
    /// Human-readable sink name for logs.
    fn name(&self) -> &str;

    /// Prepare the output. Fails with [`Error::AudioDeviceUnavailable`] when
    /// there is nothing to play on.
    fn open(&mut self, format: OutputFormat) -> Result<()>;

    /// Queue one chunk of interleaved samples.
    fn write(&mut self, chunk: &[i16]) -> Result<()>;

    /// Flush everything written and release the output.
    fn close(&mut self) -> Result<()>;

    /// Underruns seen on the device side, if the sink can tell.
    fn device_underruns(&self) -> u64 {
        0
    }
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn open(&mut self, format: OutputFormat) -> Result<()> {
        (**self).open(format)
    }

    fn write(&mut self, chunk: &[i16]) -> Result<()> {
        (**self).write(chunk)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn device_underruns(&self) -> u64 {
        (**self).device_underruns()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SinkState {
    #[default]
    Idle,
    Open,
    Closed,
}

/// Sink that records everything in memory.
///
/// Used by tests and by dry runs that want the audio without a device.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    state: SinkState,
    format: Option<OutputFormat>,
    samples: Vec<i16>,
    chunk_lens: Vec<usize>,
    opens: u32,
    closes: u32,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Format given to `open`, if it was called.
    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    /// Every sample written, interleaved.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Length of each written chunk, in samples.
    pub fn chunk_lens(&self) -> &[usize] {
        &self.chunk_lens
    }

    /// Number of `open` calls that succeeded.
    pub fn open_count(&self) -> u32 {
        self.opens
    }

    /// Number of `close` calls that succeeded.
    pub fn close_count(&self) -> u32 {
        self.closes
    }

    /// True once closed.
    pub fn is_closed(&self) -> bool {
        self.state == SinkState::Closed
    }

    /// Recorded duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        match self.format {
            Some(f) => {
                self.samples.len() as f64 / f64::from(f.channel_count()) / f64::from(f.sample_rate)
            }
            None => 0.0,
        }
    }
}

impl PlaybackSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn open(&mut self, format: OutputFormat) -> Result<()> {
        if self.state != SinkState::Idle {
            return Err(Error::SinkState("open called twice"));
        }
        self.state = SinkState::Open;
        self.format = Some(format);
        self.opens += 1;
        Ok(())
    }

    fn write(&mut self, chunk: &[i16]) -> Result<()> {
        if self.state != SinkState::Open {
            return Err(Error::SinkState("write on a sink that is not open"));
        }
        self.samples.extend_from_slice(chunk);
        self.chunk_lens.push(chunk.len());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.state != SinkState::Open {
            return Err(Error::SinkState("close on a sink that is not open"));
        }
        self.state = SinkState::Closed;
        self.closes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_enforced() {
        let mut sink = MemorySink::new();
        assert!(matches!(sink.write(&[0; 4]), Err(Error::SinkState(_))));
        sink.open(OutputFormat::default()).unwrap();
        assert!(matches!(
            sink.open(OutputFormat::default()),
            Err(Error::SinkState(_))
        ));
        sink.write(&[1, 1, 2, 2]).unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.close(), Err(Error::SinkState(_))));
        assert!(matches!(sink.write(&[0; 4]), Err(Error::SinkState(_))));
        assert_eq!(sink.open_count(), 1);
        assert_eq!(sink.close_count(), 1);
        assert_eq!(sink.samples(), &[1, 1, 2, 2]);
    }

    #[test]
    fn duration_counts_frames() {
        let mut sink = MemorySink::new();
        sink.open(OutputFormat::default()).unwrap();
        sink.write(&vec![0; 44100 * 2]).unwrap();
        assert!((sink.duration_secs() - 1.0).abs() < 1e-9);
    }
}
