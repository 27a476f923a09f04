//! Sound-event builders.
//!
//! Each builder composes primitives from `metro_core` into one segment of a
//! documented recipe and returns a [`RenderedEvent`]: the samples plus a list
//! of labelled [`Part`]s marking where notable sub-segments sit.
//!
//! Every rendered buffer starts and ends at zero. The edge fade
//! ([`EDGE_FADE_SECS`]) is shorter than the mixer's cross-fade window, so the
//! two never dip together at a splice.

pub mod acceleration;
pub mod cruising;
pub mod curve;
pub mod deceleration;
pub mod doors;
pub mod station;

mod layers;

use crate::event::{DOOR_SEQUENCE_SECS, EventKind};
use crate::{Phase, SoundEvent, SynthContext};
use metro_core::{EDGE_FADE_SECS, LIMIT_THRESHOLD, LayerMix, SampleBuffer, edge_fade};

/// Loudest a brake or acceleration squeal may get.
pub const SQUEAL_CEILING: f32 = 0.12;
/// Loudest a curve's flange squeal may get; kept below [`SQUEAL_CEILING`].
pub const CURVE_SQUEAL_CEILING: f32 = 0.08;

/// Label for a sub-segment of a rendered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// The continuous body of the segment.
    Bed,
    /// A door chime.
    Chime,
    /// Deliberate silence.
    Silence,
    /// Door air-pressure release.
    AirRelease,
    /// Door motor travel with air hiss.
    DoorMotor,
    /// Door mechanism clunk.
    Mechanism,
    /// Final door seal.
    Seal,
    /// Wheel slip on pull-away.
    WheelSlip,
    /// Air brake engagement.
    AirBrake,
    /// Brake squeal.
    BrakeSqueal,
    /// Wheel flange squeal in a curve.
    FlangeSqueal,
    /// Crossing a set of points.
    SwitchCrossing,
    /// Impact from a rail defect.
    RailDefect,
    /// Relay click while standing.
    RelayClick,
}

/// A labelled span inside a rendered buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    /// What the span contains.
    pub kind: PartKind,
    /// First sample.
    pub start: usize,
    /// Length in samples.
    pub len: usize,
}

impl Part {
    /// Span length in seconds.
    pub fn duration_secs(&self, sample_rate: f32) -> f32 {
        self.len as f32 / sample_rate
    }

    /// One past the last sample.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A builder's output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEvent {
    /// The finished segment.
    pub buffer: SampleBuffer,
    /// Labelled sub-segments, in time order.
    pub parts: Vec<Part>,
}

impl RenderedEvent {
    /// Parts of one kind, in time order.
    pub fn parts_of(&self, kind: PartKind) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(move |p| p.kind == kind)
    }
}

/// Renders events against a [`SynthContext`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventRenderer {
    ctx: SynthContext,
}

impl EventRenderer {
    /// Renderer for `ctx`.
    pub fn new(ctx: SynthContext) -> Self {
        Self { ctx }
    }

    /// Current context.
    pub fn context(&self) -> &SynthContext {
        &self.ctx
    }

    /// Swap in a new context (e.g. an updated wear snapshot).
    pub fn set_context(&mut self, ctx: SynthContext) {
        self.ctx = ctx;
    }

    /// Synthesize `event`.
    pub fn render(&self, event: &SoundEvent) -> RenderedEvent {
        match event.kind {
            EventKind::Cruising { .. } => cruising::render(event, &self.ctx),
            EventKind::Curve { .. } => curve::render(event, &self.ctx),
            EventKind::DoorSequence => doors::render(event, &self.ctx),
            EventKind::Acceleration { .. } => acceleration::render(event, &self.ctx),
            EventKind::Deceleration { .. } => deceleration::render(event, &self.ctx),
            EventKind::StationIdle => station::render(event, &self.ctx),
        }
    }
}

/// One of each event in showcase order, the way a station-to-station demo
/// would play them: doors, pull-away, cruise, curve, braking, dwell, doors.
pub fn showcase(seed: u64) -> Vec<SoundEvent> {
    const LINE_KMH: f32 = 70.0;
    const CURVE_KMH: f32 = LINE_KMH * 0.8;
    let plan = [
        (Phase::Departure, EventKind::DoorSequence, DOOR_SEQUENCE_SECS, (0.0, 0.0)),
        (
            Phase::Departure,
            EventKind::Acceleration { wheel_slip: true },
            4.0,
            (0.0, LINE_KMH),
        ),
        (
            Phase::Cruising,
            EventKind::Cruising {
                switch_crossing: true,
                rail_defect: false,
            },
            12.0,
            (LINE_KMH, LINE_KMH),
        ),
        (
            Phase::Curve,
            EventKind::Curve {
                flange_squeal: true,
            },
            3.5,
            (CURVE_KMH, CURVE_KMH),
        ),
        (
            Phase::Arrival,
            EventKind::Deceleration { brake_squeal: true },
            3.5,
            (CURVE_KMH, 0.0),
        ),
        (Phase::Dwell, EventKind::StationIdle, 2.5, (0.0, 0.0)),
        (Phase::Departure, EventKind::DoorSequence, DOOR_SEQUENCE_SECS, (0.0, 0.0)),
    ];
    plan.into_iter()
        .enumerate()
        .map(|(i, (phase, kind, secs, speeds))| {
            let event_seed = seed.wrapping_add((i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            SoundEvent::new(phase, kind, secs, 0.8, speeds, event_seed)
        })
        .collect()
}

/// Soft-limit a composed mix and apply the standard edge fade.
fn finish(mix: LayerMix) -> SampleBuffer {
    edge_fade(mix.finish(LIMIT_THRESHOLD), EDGE_FADE_SECS)
}

/// Part covering the whole buffer.
fn bed(len: usize) -> Part {
    Part {
        kind: PartKind::Bed,
        start: 0,
        len,
    }
}
