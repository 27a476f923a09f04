//! Cruising ambience: steady running between stations.
//!
//! | Layer | Source | Notes |
//! |-------|--------|-------|
//! | Rumble | noise 40–150 Hz | louder with speed and bearing wear |
//! | Motor hum | two harmonic stacks, 450–550 Hz | detuned by motor temperature |
//! | Contact noise | noise 800–2000 Hz | scaled by speed, track wear, fatigue |
//! | Rail joints | double clicks | one pair per 18 m of rail |
//! | Inverter | PWM 4–7 kHz | faint |
//! | Wobble | ~3 Hz and ~8 Hz AM on the bed | deeper with vibration |
//!
//! Optional: a switch crossing (click cluster plus frog thump) and a rail
//! defect impact, each at a random point in the segment.

use super::{Part, PartKind, RenderedEvent, bed, finish, layers};
use crate::event::{CRUISING_SECS, EventKind};
use crate::rng::Draws;
use crate::{SoundEvent, SynthContext};
use metro_core::{
    ClickShape, LIMIT_THRESHOLD, LayerMix, LfoWaveform, NoiseBand, PwmModulation,
    amplitude_modulate, clicks_at, harmonic_stack, noise, pwm, samples_for,
};

const SWITCH_SECS: f32 = 0.5;
const DEFECT_SECS: f32 = 0.4;

/// Render a cruising segment.
pub fn render(event: &SoundEvent, ctx: &SynthContext) -> RenderedEvent {
    let sr = ctx.sample_rate;
    let dur = CRUISING_SECS.clamp(event.duration_secs);
    let (switch_crossing, rail_defect) = match event.kind {
        EventKind::Cruising {
            switch_crossing,
            rail_defect,
        } => (switch_crossing, rail_defect),
        _ => (false, false),
    };
    let mut draws = Draws::new(event.seed);

    let speed = event.mean_speed_kmh();
    let speed_norm = (speed / 80.0).clamp(0.2, 1.2);
    let wear = ctx.wear.effects();
    let fscale = ctx.conditions.frequency_scale();
    let detune = 1.0 - (ctx.wear.temperature_modulation() - 1.0) * 0.1;
    let level = 0.8 + 0.2 * event.intensity;

    let hum_a = draws.uniform(450.0, 480.0) * fscale * detune;
    let hum_b = hum_a * draws.uniform(1.08, 1.15);
    let gains = ctx.conditions.motor_gains(&[1.0, 0.5, 0.25]);
    let wobble_phase = draws.uniform(0.0, 1.0);
    let wobble_slow = draws.uniform(2.6, 3.4);
    let wobble_fast = draws.uniform(7.0, 9.0);

    let mut bed_mix = LayerMix::new(dur, sr);
    bed_mix
        .add(
            &layers::rumble(dur, sr, 0.28 * (0.7 + 0.3 * speed_norm), draws.seed()),
            1.0 + wear.bearing_noise,
        )
        .add(&harmonic_stack(dur, sr, hum_a, &gains, 0.06), 1.0)
        .add(&harmonic_stack(dur, sr, hum_b, &gains, 0.045), 1.0)
        .add(
            &noise(dur, sr, NoiseBand::band(800.0, 2000.0), 0.07, draws.seed()),
            speed_norm * ctx.conditions.contact_gain() * (1.0 + wear.roughness),
        );
    let body = amplitude_modulate(
        bed_mix.finish(LIMIT_THRESHOLD),
        wobble_slow,
        0.08 * (1.0 + wear.vibration),
        LfoWaveform::Sine,
        wobble_phase,
    );
    let body = amplitude_modulate(body, wobble_fast, 0.05, LfoWaveform::Sine, wobble_phase);

    let joints = layers::rail_joints(dur, sr, speed, 0.2, draws.seed());
    let inverter = pwm(
        dur,
        sr,
        (4000.0, 7000.0),
        PwmModulation {
            duty: 0.5,
            duty_depth: 0.15,
            rate_hz: 0.4,
        },
        0.012,
        draws.seed(),
    );

    let mut mix = LayerMix::new(dur, sr);
    mix.add(&body, level).add(&joints, level).add(&inverter, level);
    let mut parts = vec![bed(mix.len())];

    // Feature timing is drawn whether or not the feature fires.
    let switch_at = draws.uniform(0.2, 0.7) * dur;
    let switch_seed = draws.seed();
    let defect_at = draws.uniform(0.1, 0.9) * dur;
    let defect_seed = draws.seed();

    if switch_crossing {
        let ticks = clicks_at(
            SWITCH_SECS,
            sr,
            &[0.0, 0.11, 0.19, 0.34],
            ClickShape::Impulse { decay_secs: 0.008 },
            0.3,
            switch_seed,
        );
        let frog = clicks_at(
            SWITCH_SECS,
            sr,
            &[0.19],
            ClickShape::Thump {
                freq_hz: 70.0,
                decay_secs: 0.05,
            },
            0.25,
            switch_seed ^ 1,
        );
        mix.add_at_secs(&ticks, level, switch_at)
            .add_at_secs(&frog, level, switch_at);
        parts.push(span(PartKind::SwitchCrossing, switch_at, SWITCH_SECS, sr));
    }

    if rail_defect {
        let thud = clicks_at(
            DEFECT_SECS,
            sr,
            &[0.0],
            ClickShape::Thump {
                freq_hz: 55.0,
                decay_secs: 0.08,
            },
            0.35,
            defect_seed,
        );
        let crack = clicks_at(
            DEFECT_SECS,
            sr,
            &[0.0],
            ClickShape::Impulse { decay_secs: 0.01 },
            0.25,
            defect_seed ^ 1,
        );
        mix.add_at_secs(&thud, level, defect_at)
            .add_at_secs(&crack, level, defect_at);
        parts.push(span(PartKind::RailDefect, defect_at, DEFECT_SECS, sr));
    }

    parts.sort_by_key(|p| p.start);
    RenderedEvent {
        buffer: finish(mix),
        parts,
    }
}

fn span(kind: PartKind, at_secs: f32, secs: f32, sr: f32) -> Part {
    Part {
        kind,
        start: samples_for(at_secs, sr),
        len: samples_for(secs, sr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;

    fn event(switch_crossing: bool, rail_defect: bool) -> SoundEvent {
        SoundEvent::new(
            Phase::Cruising,
            EventKind::Cruising {
                switch_crossing,
                rail_defect,
            },
            10.0,
            0.8,
            (70.0, 70.0),
            21,
        )
    }

    #[test]
    fn plain_cruise_has_only_a_bed() {
        let out = render(&event(false, false), &SynthContext::default());
        assert_eq!(out.parts.len(), 1);
        assert_eq!(out.parts[0].kind, PartKind::Bed);
    }

    #[test]
    fn features_add_labelled_parts() {
        let out = render(&event(true, true), &SynthContext::default());
        assert_eq!(out.parts_of(PartKind::SwitchCrossing).count(), 1);
        assert_eq!(out.parts_of(PartKind::RailDefect).count(), 1);
    }

    #[test]
    fn switch_crossing_changes_only_its_window() {
        let ctx = SynthContext::default();
        let plain = render(&event(false, false), &ctx);
        let switched = render(&event(true, false), &ctx);
        let part = *switched.parts_of(PartKind::SwitchCrossing).next().unwrap();
        let before = part.start.saturating_sub(1);
        assert_eq!(
            plain.buffer.samples()[..before],
            switched.buffer.samples()[..before]
        );
    }
}
