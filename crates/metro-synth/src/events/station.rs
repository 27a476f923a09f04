//! Station idle: the train standing at the platform.
//!
//! Supply hum at 60/120/180 Hz, an air compressor cycling with a period near
//! three seconds, cooling-fan turbulence around 100 Hz, the inverter idling
//! in standby, and up to two relay clicks.

use super::{Part, PartKind, RenderedEvent, bed, finish};
use crate::event::STATION_IDLE_SECS;
use crate::rng::Draws;
use crate::{SoundEvent, SynthContext};
use core::f32::consts::TAU;
use libm::{sinf, tanhf};
use metro_core::{
    ClickShape, LayerMix, LfoWaveform, NoiseBand, PwmModulation, SampleBuffer, amplitude_modulate,
    clicks_at, envelope_apply_fn, harmonic_stack, noise, pwm, samples_for,
};

const RELAY_CLICK_SECS: f32 = 0.01;

/// Render a station idle segment.
pub fn render(event: &SoundEvent, ctx: &SynthContext) -> RenderedEvent {
    let sr = ctx.sample_rate;
    let dur = STATION_IDLE_SECS.clamp(event.duration_secs);
    let mut draws = Draws::new(event.seed);
    let level = 0.8 + 0.2 * event.intensity;

    let hum = harmonic_stack(dur, sr, 60.0, &[1.0, 0.6, 0.35], 0.08);

    let period = draws.uniform(2.7, 3.3);
    let cycle_phase = draws.uniform(0.0, 1.0);
    let compressor_hz = draws.uniform(170.0, 190.0);
    let motor = harmonic_stack(dur, sr, compressor_hz, &[1.0, 0.5, 0.25], 0.07);
    let hiss = noise(dur, sr, NoiseBand::band(150.0, 500.0), 0.04, draws.seed());
    let compressor = envelope_apply_fn(
        SampleBuffer::from_fn(motor.len(), sr, |n| {
            motor.samples()[n] + hiss.samples()[n]
        }),
        // Smoothed square gate: on for half of each cycle.
        |t, _| 0.5 + 0.5 * tanhf(6.0 * sinf(TAU * (t / period + cycle_phase))),
    );

    let fan = amplitude_modulate(
        noise(dur, sr, NoiseBand::band(90.0, 110.0), 0.1, draws.seed()),
        0.4,
        0.2,
        LfoWaveform::Sine,
        draws.uniform(0.0, 1.0),
    );
    let standby = amplitude_modulate(
        pwm(
            dur,
            sr,
            (3000.0, 5000.0),
            PwmModulation {
                duty: 0.5,
                duty_depth: 0.1,
                rate_hz: 0.2,
            },
            0.015,
            draws.seed(),
        ),
        120.0,
        0.5,
        LfoWaveform::Sine,
        0.0,
    );

    let mut mix = LayerMix::new(dur, sr);
    mix.add(&hum, level)
        .add(&compressor, level)
        .add(&fan, level)
        .add(&standby, level);
    let mut parts = vec![bed(mix.len())];

    let clicks = draws.up_to(2);
    let mut times: Vec<f32> = (0..clicks).map(|_| draws.uniform(0.1, dur - 0.1)).collect();
    times.sort_by(f32::total_cmp);
    let relays = clicks_at(
        dur,
        sr,
        &times,
        ClickShape::Impulse { decay_secs: 0.003 },
        0.15,
        draws.seed(),
    );
    mix.add(&relays, level);
    parts.extend(times.iter().map(|&t| Part {
        kind: PartKind::RelayClick,
        start: samples_for(t, sr),
        len: samples_for(RELAY_CLICK_SECS, sr),
    }));

    RenderedEvent {
        buffer: finish(mix),
        parts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;
    use crate::event::EventKind;

    #[test]
    fn relay_clicks_are_bounded() {
        let ctx = SynthContext::default();
        for seed in 0..12 {
            let event =
                SoundEvent::new(Phase::Dwell, EventKind::StationIdle, 2.5, 0.6, (0.0, 0.0), seed);
            let clicks = render(&event, &ctx).parts_of(PartKind::RelayClick).count();
            assert!(clicks <= 2, "seed {seed}: {clicks} clicks");
        }
    }
}
