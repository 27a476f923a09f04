//! Curve: the motor note rises, rumble and contact noise grow, and the wheel
//! flanges may squeal against the rail.
//!
//! The flange squeal is a cluster of three inharmonic partials near 1.8, 2.4
//! and 3.1 kHz, pulsing at 4–7 Hz. Its level scales with intensity and never
//! exceeds [`CURVE_SQUEAL_CEILING`].

use super::{CURVE_SQUEAL_CEILING, Part, PartKind, RenderedEvent, bed, finish, layers};
use crate::event::{CURVE_SECS, EventKind};
use crate::rng::Draws;
use crate::{SoundEvent, SynthContext};
use metro_core::{
    LIMIT_THRESHOLD, LayerMix, LfoWaveform, NoiseBand, SweepShape, amplitude_modulate,
    harmonic_sweep, noise, samples_for,
};

const FLANGE_PARTIALS_HZ: [f32; 3] = [1800.0, 2400.0, 3100.0];

/// Render a curve segment.
pub fn render(event: &SoundEvent, ctx: &SynthContext) -> RenderedEvent {
    let sr = ctx.sample_rate;
    let dur = CURVE_SECS.clamp(event.duration_secs);
    let flange_squeal = matches!(
        event.kind,
        EventKind::Curve {
            flange_squeal: true
        }
    );
    let mut draws = Draws::new(event.seed);

    let speed = event.mean_speed_kmh();
    let wear = ctx.wear.effects();
    let fscale = ctx.conditions.frequency_scale();
    let gains = ctx.conditions.motor_gains(&[1.0, 0.4, 0.2]);
    let wobble_phase = draws.uniform(0.0, 1.0);

    let mut bed_mix = LayerMix::new(dur, sr);
    bed_mix
        .add(
            &harmonic_sweep(
                dur,
                sr,
                500.0 * fscale,
                600.0 * fscale,
                SweepShape::Linear,
                &gains,
                0.06,
            ),
            1.0,
        )
        .add(
            &layers::rumble(dur, sr, 0.34, draws.seed()),
            1.0 + wear.bearing_noise,
        )
        .add(
            &noise(dur, sr, NoiseBand::band(900.0, 1500.0), 0.1, draws.seed()),
            ctx.conditions.contact_gain() * (1.0 + wear.roughness),
        );
    let body = amplitude_modulate(
        bed_mix.finish(LIMIT_THRESHOLD),
        draws.uniform(2.5, 3.5),
        0.12 * (1.0 + wear.vibration),
        LfoWaveform::Sine,
        wobble_phase,
    );

    let mut mix = LayerMix::new(dur, sr);
    mix.add(&body, 1.0)
        .add(&layers::rail_joints(dur, sr, speed, 0.16, draws.seed()), 1.0);
    let mut parts = vec![bed(mix.len())];

    let squeal_start = draws.uniform(0.1, 0.2) * dur;
    let squeal_len = dur * 0.95 - squeal_start;
    let pulse_hz = draws.uniform(4.0, 7.0);
    let squeal_seed = draws.seed();
    if flange_squeal {
        let level = (CURVE_SQUEAL_CEILING * event.intensity).min(CURVE_SQUEAL_CEILING);
        let squeal = layers::squeal(
            squeal_len,
            sr,
            &FLANGE_PARTIALS_HZ.map(|f| f * fscale),
            pulse_hz,
            level,
            &mut Draws::new(squeal_seed),
        );
        mix.add_at_secs(&squeal, 1.0, squeal_start);
        parts.push(Part {
            kind: PartKind::FlangeSqueal,
            start: samples_for(squeal_start, sr),
            len: squeal.len(),
        });
    }

    RenderedEvent {
        buffer: finish(mix),
        parts,
    }
}
