//! Door sequence: chimes, air release, door travel, mechanism, seal.
//!
//! Fixed timeline (seconds):
//!
//! ```text
//! 0.00  chime 880 Hz   0.18
//! 0.30  chime 800 Hz   0.18
//! 0.60  chime 720 Hz   0.18
//! 0.78  silence        0.25
//! 1.03  air release    0.50   noise 1.5–6 kHz, exponential decay
//! 1.53  door motor     1.00   sweep 210 → 145 Hz + hiss 3–9 kHz
//! 2.53  mechanism      0.35   noise 150–400 Hz + two latch clicks
//! 2.88  seal           0.40   145 Hz thump + air equalization
//! 3.28  end
//! ```
//!
//! Each sub-segment carries its own short fade, so nothing starts or stops
//! abruptly.

use super::{Part, PartKind, RenderedEvent, finish};
use crate::event::DOOR_SEQUENCE_SECS;
use crate::rng::Draws;
use crate::{SoundEvent, SynthContext};
use metro_core::{
    ClickShape, Envelope, LayerMix, NoiseBand, SampleBuffer, SweepShape, clicks_at, edge_fade,
    envelope_apply, harmonic_stack, harmonic_sweep, noise, samples_for,
};

/// Length of one chime.
pub const CHIME_SECS: f32 = 0.18;
/// Gap between chimes.
pub const CHIME_GAP_SECS: f32 = 0.12;
/// Chime pitches, a falling three-note figure around 800 Hz.
pub const CHIME_HZ: [f32; 3] = [880.0, 800.0, 720.0];

const SILENCE_SECS: f32 = 0.25;
const AIR_RELEASE_SECS: f32 = 0.5;
const MOTOR_SECS: f32 = 1.0;
const MECHANISM_SECS: f32 = 0.35;
const SEAL_SECS: f32 = 0.4;
const SUB_FADE_SECS: f32 = 0.005;

/// Render the door sequence. The event's duration is ignored; the timeline
/// above always spans [`DOOR_SEQUENCE_SECS`].
pub fn render(event: &SoundEvent, ctx: &SynthContext) -> RenderedEvent {
    let sr = ctx.sample_rate;
    let mut draws = Draws::new(event.seed);
    let level = 0.8 + 0.2 * event.intensity;
    let age = ctx.conditions.vehicle_age;

    let mut mix = LayerMix::new(DOOR_SEQUENCE_SECS, sr);
    let mut parts = Vec::with_capacity(8);
    let mut cursor = 0.0f32;

    for (i, &freq) in CHIME_HZ.iter().enumerate() {
        let chime = harmonic_stack(CHIME_SECS, sr, freq, &[1.0, 0.35, 0.12], 0.22);
        let chime = envelope_apply(
            chime,
            &Envelope::AttackDecay {
                attack_secs: SUB_FADE_SECS,
                tau_secs: 0.09,
            },
        );
        let chime = edge_fade(chime, SUB_FADE_SECS);
        place(&mut mix, &mut parts, PartKind::Chime, chime, cursor, level);
        cursor += CHIME_SECS;
        if i + 1 < CHIME_HZ.len() {
            cursor += CHIME_GAP_SECS;
        }
    }

    parts.push(Part {
        kind: PartKind::Silence,
        start: samples_for(cursor, sr),
        len: samples_for(SILENCE_SECS, sr),
    });
    cursor += SILENCE_SECS;

    let air = noise(
        AIR_RELEASE_SECS,
        sr,
        NoiseBand::band(1500.0, 6000.0),
        0.26 * (0.8 + 0.4 * age),
        draws.seed(),
    );
    let air = envelope_apply(
        air,
        &Envelope::AttackDecay {
            attack_secs: 0.004,
            tau_secs: 0.16,
        },
    );
    place(
        &mut mix,
        &mut parts,
        PartKind::AirRelease,
        edge_fade(air, SUB_FADE_SECS),
        cursor,
        level,
    );
    cursor += AIR_RELEASE_SECS;

    let start_hz = draws.uniform(200.0, 220.0);
    let motor = harmonic_sweep(
        MOTOR_SECS,
        sr,
        start_hz,
        145.0,
        SweepShape::Exponential,
        &[1.0, 0.5, 0.3, 0.15],
        0.12,
    );
    let hiss = noise(
        MOTOR_SECS,
        sr,
        NoiseBand::band(3000.0, 9000.0),
        0.05 * (0.8 + 0.4 * age),
        draws.seed(),
    );
    let travel = SampleBuffer::from_fn(motor.len(), sr, |n| motor.samples()[n] + hiss.samples()[n]);
    let travel = envelope_apply(
        travel,
        &Envelope::Fade {
            in_secs: 0.08,
            out_secs: 0.1,
        },
    );
    place(
        &mut mix,
        &mut parts,
        PartKind::DoorMotor,
        travel,
        cursor,
        level,
    );
    cursor += MOTOR_SECS;

    let clunk = noise(MECHANISM_SECS, sr, NoiseBand::band(150.0, 400.0), 0.16, draws.seed());
    let clunk = envelope_apply(
        clunk,
        &Envelope::AttackDecay {
            attack_secs: 0.01,
            tau_secs: 0.12,
        },
    );
    let latches = clicks_at(
        MECHANISM_SECS,
        sr,
        &[0.05, 0.21],
        ClickShape::Impulse { decay_secs: 0.004 },
        0.22,
        draws.seed(),
    );
    let mechanism = SampleBuffer::from_fn(clunk.len(), sr, |n| {
        clunk.samples()[n] + latches.samples()[n]
    });
    let mechanism = edge_fade(mechanism, SUB_FADE_SECS);
    place(
        &mut mix,
        &mut parts,
        PartKind::Mechanism,
        mechanism,
        cursor,
        level,
    );
    cursor += MECHANISM_SECS;

    let thump = harmonic_stack(SEAL_SECS, sr, 145.0, &[1.0, 0.3], 0.25);
    let thump = envelope_apply(
        thump,
        &Envelope::AttackDecay {
            attack_secs: 0.004,
            tau_secs: 0.09,
        },
    );
    let settle = noise(SEAL_SECS, sr, NoiseBand::band(200.0, 1200.0), 0.05, draws.seed());
    let settle = envelope_apply(settle, &Envelope::ExponentialDecay { tau_secs: 0.15 });
    let seal = SampleBuffer::from_fn(thump.len(), sr, |n| thump.samples()[n] + settle.samples()[n]);
    place(
        &mut mix,
        &mut parts,
        PartKind::Seal,
        edge_fade(seal, SUB_FADE_SECS),
        cursor,
        level,
    );

    RenderedEvent {
        buffer: finish(mix),
        parts,
    }
}

fn place(
    mix: &mut LayerMix,
    parts: &mut Vec<Part>,
    kind: PartKind,
    layer: SampleBuffer,
    at_secs: f32,
    gain: f32,
) {
    let start = samples_for(at_secs, mix.sample_rate());
    mix.add_at(&layer, gain, start);
    parts.push(Part {
        kind,
        start,
        len: layer.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;
    use crate::event::EventKind;

    fn door() -> SoundEvent {
        SoundEvent::new(
            Phase::Departure,
            EventKind::DoorSequence,
            DOOR_SEQUENCE_SECS,
            0.8,
            (0.0, 0.0),
            4,
        )
    }

    #[test]
    fn timeline_fills_the_sequence() {
        let out = render(&door(), &SynthContext::default());
        let seal = out.parts_of(PartKind::Seal).next().unwrap();
        assert_eq!(seal.end(), out.buffer.len());
    }

    #[test]
    fn silence_part_is_silent() {
        let out = render(&door(), &SynthContext::default());
        let gap = *out.parts_of(PartKind::Silence).next().unwrap();
        let quiet = &out.buffer.samples()[gap.start..gap.end()];
        assert!(quiet.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn parts_are_in_time_order() {
        let out = render(&door(), &SynthContext::default());
        assert!(out.parts.windows(2).all(|w| w[0].start <= w[1].start));
    }
}
