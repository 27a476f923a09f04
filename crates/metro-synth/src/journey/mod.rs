//! The journey: phase machine, parameters and the rendering source.
//!
//! [`Sequencer`] decides *what* plays next; [`Journey`] pairs it with an
//! [`EventRenderer`] so the playback pipeline can pull finished buffers.

mod decision;
mod params;
mod phase;
mod sequencer;

pub use decision::{CruiseDecision, CruiseProgress, decide_after_cruise, roll};
pub use params::{EventOdds, JourneyParams};
pub use phase::Phase;
pub use sequencer::{JourneyState, Sequencer};

use crate::{EventRenderer, SoundEvent, SynthContext};
use metro_core::{SampleBuffer, SegmentSource};

/// A sequencer wired to a renderer.
///
/// Each pull renders one event against the current wear snapshot, so brake
/// and motor temperatures carry from one segment into the next.
///
/// ```rust
/// use metro_core::SegmentSource;
/// use metro_synth::{Journey, JourneyParams};
///
/// let mut journey = Journey::new(JourneyParams::default(), 9, 44100.0).with_budget_secs(3.0);
/// let doors = journey.next_segment().unwrap();
/// assert!(doors.duration_secs() > 3.0);
/// assert!(journey.next_segment().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Journey {
    sequencer: Sequencer,
    renderer: EventRenderer,
}

impl Journey {
    /// Unbounded journey rendering at `sample_rate`.
    pub fn new(params: JourneyParams, seed: u64, sample_rate: f32) -> Self {
        let sequencer = Sequencer::new(params, seed);
        let ctx = SynthContext::new(sample_rate, sequencer.params().conditions);
        Self {
            sequencer,
            renderer: EventRenderer::new(ctx),
        }
    }

    /// Stop after `secs` of audio, finishing the event that crosses the line.
    pub fn with_budget_secs(mut self, secs: f64) -> Self {
        self.sequencer = self.sequencer.with_budget_secs(secs);
        self
    }

    /// Budget against what a mixer that cross-fades `overlap_samples` at
    /// every splice will actually play.
    pub fn with_splice_overlap(mut self, overlap_samples: usize) -> Self {
        let sample_rate = self.renderer.context().sample_rate;
        self.sequencer = self
            .sequencer
            .with_splice_overlap(sample_rate, overlap_samples);
        self
    }

    /// The underlying sequencer.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Schedule and render the next event.
    pub fn next_rendered(&mut self) -> Option<(SoundEvent, SampleBuffer)> {
        let wear = self.sequencer.state().wear;
        let event = self.sequencer.next_event()?;
        let mut ctx = *self.renderer.context();
        ctx.wear = wear;
        self.renderer.set_context(ctx);

        let rendered = self.renderer.render(&event);
        tracing::info!(
            phase = %event.phase,
            kind = event.kind.name(),
            duration = event.duration_secs,
            brake_temp_c = wear.brake_temp_c,
            "rendering event"
        );
        Some((event, rendered.buffer))
    }
}

impl SegmentSource for Journey {
    fn next_segment(&mut self) -> Option<SampleBuffer> {
        self.next_rendered().map(|(_, buffer)| buffer)
    }
}
