//! Pull-based segment producers.

use crate::SampleBuffer;

/// Something that hands out finished segments one at a time.
///
/// The playback pipeline calls [`SegmentSource::next_segment`] on its
/// producer thread until it returns `None` or a stop is requested.
pub trait SegmentSource {
    /// The next segment, or `None` when the source is exhausted.
    fn next_segment(&mut self) -> Option<SampleBuffer>;
}

impl<S: SegmentSource + ?Sized> SegmentSource for Box<S> {
    fn next_segment(&mut self) -> Option<SampleBuffer> {
        (**self).next_segment()
    }
}

/// Adapts any iterator of buffers into a [`SegmentSource`].
///
/// ```rust
/// use metro_core::{SampleBuffer, SegmentSource, Segments};
///
/// let mut src = Segments::new(vec![SampleBuffer::silence(0.1, 44100.0)]);
/// assert!(src.next_segment().is_some());
/// assert!(src.next_segment().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Segments<I>(I);

impl<I: Iterator<Item = SampleBuffer>> Segments<I> {
    /// Wrap an iterable of buffers.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self(iter.into_iter())
    }
}

impl<I: Iterator<Item = SampleBuffer>> SegmentSource for Segments<I> {
    fn next_segment(&mut self) -> Option<SampleBuffer> {
        self.0.next()
    }
}
