//! Metro Synth - sound-event builders and the journey sequencer
//!
//! Turns a seeded random stream into a station-to-station journey and renders
//! each step of it from the primitives in `metro_core`.
//!
//! # Scheduling
//!
//! - [`Sequencer`] - Phase machine emitting one [`SoundEvent`] at a time
//! - [`JourneyParams`] / [`EventOdds`] - Durations, speeds and probabilities
//! - [`decide_after_cruise`] - Pure branching after each running segment
//!
//! # Synthesis
//!
//! - [`EventRenderer`] - Dispatches an event to its builder
//! - [`events`] - One builder per event kind
//! - [`Conditions`] / [`WearState`] - Run conditions and thermal/mechanical wear
//!
//! # Streaming
//!
//! - [`Journey`] - Sequencer plus renderer, usable as a [`metro_core::SegmentSource`]
//!
//! # Example
//!
//! ```rust
//! use metro_synth::{EventRenderer, JourneyParams, Sequencer, SynthContext};
//!
//! let renderer = EventRenderer::new(SynthContext::default());
//! let seq = Sequencer::new(JourneyParams::default(), 7).with_budget_secs(10.0);
//! for event in seq {
//!     let rendered = renderer.render(&event);
//!     assert_eq!(rendered.buffer.len(), event.sample_len(44100.0));
//! }
//! ```

pub mod conditions;
pub mod event;
pub mod events;
pub mod journey;

mod rng;

pub use conditions::{Conditions, SynthContext, WearEffects, WearState};
pub use event::{
    ACCELERATION_SECS, CRUISING_SECS, CURVE_SECS, DECELERATION_SECS, DOOR_SEQUENCE_SECS,
    EventKind, INTENSITY, SPEED_KMH, STATION_IDLE_SECS, SoundEvent,
};
pub use events::{
    CURVE_SQUEAL_CEILING, EventRenderer, Part, PartKind, RenderedEvent, SQUEAL_CEILING, showcase,
};
pub use journey::{
    CruiseDecision, CruiseProgress, EventOdds, Journey, JourneyParams, JourneyState, Phase,
    Sequencer, decide_after_cruise, roll,
};
