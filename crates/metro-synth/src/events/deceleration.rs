//! Deceleration: braking into the platform.
//!
//! Regenerative braking sweeps the motor note 850 → 200 Hz while its upper
//! harmonics (1700 → 400 Hz) fade. The air brake engages a fifth of the way
//! in, friction noise builds toward the stop, and a low grind closes the
//! segment. Hot brakes push the optional squeal (2.5–4 kHz) sharper.

use super::{Part, PartKind, RenderedEvent, SQUEAL_CEILING, finish, layers};
use crate::event::{DECELERATION_SECS, EventKind};
use crate::rng::Draws;
use crate::{SoundEvent, SynthContext};
use metro_core::{
    EDGE_FADE_SECS, Envelope, LayerMix, NoiseBand, SweepShape, envelope_apply, harmonic_sweep,
    noise, samples_for,
};

const AIR_BRAKE_SECS: f32 = 0.6;
const FADE_OUT_SECS: f32 = 0.3;

/// Render a deceleration segment.
pub fn render(event: &SoundEvent, ctx: &SynthContext) -> RenderedEvent {
    let sr = ctx.sample_rate;
    let dur = DECELERATION_SECS.clamp(event.duration_secs);
    let brake_squeal = matches!(event.kind, EventKind::Deceleration { brake_squeal: true });
    let mut draws = Draws::new(event.seed);

    let wear = ctx.wear.effects();
    let fscale = ctx.conditions.frequency_scale();
    let gains = ctx.conditions.motor_gains(&[1.0, 0.5, 0.3]);

    let regen = envelope_apply(
        harmonic_sweep(
            dur,
            sr,
            850.0 * fscale,
            200.0 * fscale,
            SweepShape::Exponential,
            &gains,
            0.08,
        ),
        &Envelope::Linear { from: 1.0, to: 0.3 },
    );
    let fading = envelope_apply(
        harmonic_sweep(
            dur,
            sr,
            1700.0 * fscale,
            400.0 * fscale,
            SweepShape::Linear,
            &[1.0, 0.3],
            0.03,
        ),
        &Envelope::Linear { from: 1.0, to: 0.1 },
    );
    let air_brake = envelope_apply(
        noise(AIR_BRAKE_SECS, sr, NoiseBand::band(800.0, 4000.0), 0.12, draws.seed()),
        &Envelope::AttackDecay {
            attack_secs: 0.01,
            tau_secs: 0.25,
        },
    );
    let friction = envelope_apply(
        noise(dur, sr, NoiseBand::band(100.0, 400.0), 0.14, draws.seed()),
        &Envelope::Breakpoints(vec![(0.0, 0.0), (0.2, 0.0), (0.85, 1.0), (1.0, 0.8)]),
    );
    let rumble = envelope_apply(
        layers::rumble(dur, sr, 0.22, draws.seed()),
        &Envelope::Linear { from: 1.0, to: 0.2 },
    );
    let tail_secs = dur * 0.25;
    let grind = envelope_apply(
        layers::grinding(tail_secs, sr, 0.1, draws.seed()),
        &Envelope::fade(0.05),
    );

    let air_at = dur * 0.2;
    let mut mix = LayerMix::new(dur, sr);
    mix.add(&regen, 1.0)
        .add(&fading, 1.0)
        .add(&friction, 1.0 + wear.roughness)
        .add(&rumble, 1.0 + wear.bearing_noise)
        .add_at_secs(&air_brake, 1.0, air_at)
        .add_at_secs(&grind, 1.0, dur - tail_secs);

    let mut parts = vec![
        super::bed(mix.len()),
        Part {
            kind: PartKind::AirBrake,
            start: samples_for(air_at, sr),
            len: air_brake.len(),
        },
    ];

    // Hot discs squeal higher: up to +8% at full temperature modulation.
    let heat = ((ctx.wear.temperature_modulation() - 1.0) * 0.5).clamp(0.0, 0.08);
    let squeal_hz = draws.uniform(2500.0, 4000.0) * (1.0 + heat);
    let squeal_at = draws.uniform(0.5, 0.6) * dur;
    let squeal_seed = draws.seed();
    if brake_squeal {
        let squeal_secs = dur * 0.95 - squeal_at;
        let level = (SQUEAL_CEILING * event.intensity).min(SQUEAL_CEILING);
        let squeal = layers::squeal(
            squeal_secs,
            sr,
            &[squeal_hz, squeal_hz * 1.5],
            9.0,
            level,
            &mut Draws::new(squeal_seed),
        );
        mix.add_at_secs(&squeal, 1.0, squeal_at);
        parts.push(Part {
            kind: PartKind::BrakeSqueal,
            start: samples_for(squeal_at, sr),
            len: squeal.len(),
        });
    }

    let level = 0.8 + 0.2 * event.intensity;
    let buffer = envelope_apply(
        finish(mix).scaled(level),
        &Envelope::Fade {
            in_secs: EDGE_FADE_SECS,
            out_secs: FADE_OUT_SECS,
        },
    );

    RenderedEvent { buffer, parts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;

    #[test]
    fn air_brake_engages_at_a_fifth() {
        let event = SoundEvent::new(
            Phase::Arrival,
            EventKind::Deceleration {
                brake_squeal: false,
            },
            3.5,
            0.8,
            (70.0, 0.0),
            6,
        );
        let out = render(&event, &SynthContext::default());
        let air = out.parts_of(PartKind::AirBrake).next().unwrap();
        assert_eq!(air.start, samples_for(0.7, 44100.0));
    }

    #[test]
    fn squeal_follows_the_flag() {
        let mk = |brake_squeal| {
            SoundEvent::new(
                Phase::Arrival,
                EventKind::Deceleration { brake_squeal },
                3.5,
                0.8,
                (70.0, 0.0),
                6,
            )
        };
        let ctx = SynthContext::default();
        assert_eq!(
            render(&mk(true), &ctx)
                .parts_of(PartKind::BrakeSqueal)
                .count(),
            1
        );
        assert_eq!(
            render(&mk(false), &ctx)
                .parts_of(PartKind::BrakeSqueal)
                .count(),
            0
        );
    }
}
