//! Acceleration: pulling away from the platform.
//!
//! Traction motors sweep 250 → 850 Hz with load harmonics 500 → 1700 Hz; the
//! inverter surges at start-up and decays; low-speed grinding fades as the
//! train gathers pace; rumble builds with speed. The whole segment ramps from
//! quiet to full. A wheel slip (rapid FM tone over chattering grit) may break
//! out early in the pull-away.

use super::{Part, PartKind, RenderedEvent, SQUEAL_CEILING, finish, layers};
use crate::event::{ACCELERATION_SECS, EventKind};
use crate::rng::Draws;
use crate::{SoundEvent, SynthContext};
use metro_core::{
    Envelope, LayerMix, PwmModulation, SweepShape, envelope_apply, harmonic_sweep, pwm,
    samples_for,
};

/// Render an acceleration segment.
pub fn render(event: &SoundEvent, ctx: &SynthContext) -> RenderedEvent {
    let sr = ctx.sample_rate;
    let dur = ACCELERATION_SECS.clamp(event.duration_secs);
    let wheel_slip = matches!(event.kind, EventKind::Acceleration { wheel_slip: true });
    let mut draws = Draws::new(event.seed);

    let wear = ctx.wear.effects();
    let fscale = ctx.conditions.frequency_scale();
    let gains = ctx.conditions.motor_gains(&[1.0, 0.5, 0.3, 0.2]);
    let top_hz = draws.uniform(820.0, 880.0) * fscale;

    let traction = harmonic_sweep(
        dur,
        sr,
        250.0 * fscale,
        top_hz,
        SweepShape::Exponential,
        &gains,
        0.08,
    );
    let load = harmonic_sweep(
        dur,
        sr,
        500.0 * fscale,
        top_hz * 2.0,
        SweepShape::Exponential,
        &[1.0, 0.4],
        0.03,
    );
    let surge = envelope_apply(
        pwm(
            dur,
            sr,
            (4000.0, 6000.0),
            PwmModulation {
                duty: 0.5,
                duty_depth: 0.3,
                rate_hz: 1.5,
            },
            0.05,
            draws.seed(),
        ),
        &Envelope::ExponentialDecay { tau_secs: 1.2 },
    );
    let grinding = envelope_apply(
        layers::grinding(dur, sr, 0.12, draws.seed()),
        &Envelope::Breakpoints(vec![(0.0, 1.0), (0.3, 0.3), (0.6, 0.0)]),
    );
    let rumble = envelope_apply(
        layers::rumble(dur, sr, 0.22, draws.seed()),
        &Envelope::Linear { from: 0.3, to: 1.0 },
    );

    let mut mix = LayerMix::new(dur, sr);
    mix.add(&traction, 1.0)
        .add(&load, 1.0)
        .add(&surge, 1.0)
        .add(&grinding, 1.0 + wear.roughness)
        .add(&rumble, 1.0 + wear.bearing_noise);

    let mut parts = vec![super::bed(mix.len())];

    let slip_at = draws.uniform(0.2, 0.4) * dur;
    let slip_secs = draws.uniform(0.5, 0.8);
    let slip_seed = draws.seed();
    if wheel_slip {
        let level = SQUEAL_CEILING * (0.6 + 0.4 * event.intensity);
        let slip = layers::wheel_slip(slip_secs, sr, level, &mut Draws::new(slip_seed));
        mix.add_at_secs(&slip, 1.0, slip_at);
        parts.push(Part {
            kind: PartKind::WheelSlip,
            start: samples_for(slip_at, sr),
            len: slip.len(),
        });
    }

    // Quiet-to-full ramp; the gentle fade-in replaces the standard edge fade
    // at the head.
    let level = 0.8 + 0.2 * event.intensity;
    let ramped = envelope_apply(
        finish(mix),
        &Envelope::Linear {
            from: 0.35 * level,
            to: level,
        },
    );
    let buffer = envelope_apply(
        ramped,
        &Envelope::Fade {
            in_secs: 0.15,
            out_secs: metro_core::EDGE_FADE_SECS,
        },
    );

    RenderedEvent { buffer, parts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;

    #[test]
    fn ramps_from_quiet_to_full() {
        let event = SoundEvent::new(
            Phase::Departure,
            EventKind::Acceleration { wheel_slip: false },
            4.0,
            0.8,
            (0.0, 70.0),
            5,
        );
        let out = render(&event, &SynthContext::default());
        let sr = 44100;
        let head = out.buffer.slice(sr / 4, sr / 2).rms();
        let tail = out.buffer.slice(3 * sr, sr / 2).rms();
        assert!(tail > head, "head {head} tail {tail}");
    }
}
