//! Layer recipes shared by several builders.

use crate::rng::Draws;
use core::f32::consts::TAU;
use libm::sinf;
use metro_core::{
    ClickInterval, ClickShape, Envelope, Lfo, LfoWaveform, NoiseBand, SampleBuffer,
    amplitude_modulate, envelope_apply, noise, periodic_click, samples_for,
};

/// Standard rail length between joints.
pub(super) const RAIL_LENGTH_M: f32 = 18.0;
/// Distance between the two axles of a bogie.
pub(super) const AXLE_SPACING_M: f32 = 2.5;

/// Swell in, hold, swell out.
fn swell() -> Envelope {
    Envelope::Breakpoints(vec![(0.0, 0.0), (0.2, 1.0), (0.8, 1.0), (1.0, 0.0)])
}

/// Low tunnel rumble, 40–150 Hz.
pub(super) fn rumble(duration: f32, sr: f32, amplitude: f32, seed: u64) -> SampleBuffer {
    noise(duration, sr, NoiseBand::band(40.0, 150.0), amplitude, seed)
}

/// Double clicks at each rail joint; silent when stationary.
pub(super) fn rail_joints(
    duration: f32,
    sr: f32,
    speed_kmh: f32,
    amplitude: f32,
    seed: u64,
) -> SampleBuffer {
    let mps = (speed_kmh / 3.6).max(0.1);
    let interval = ClickInterval::SpeedScaled {
        spacing_m: RAIL_LENGTH_M,
        speed_kmh,
    };
    let shape = ClickShape::Double {
        spacing_secs: (AXLE_SPACING_M / mps).min(0.25),
        decay_secs: 0.006,
    };
    periodic_click(duration, sr, interval, shape, amplitude, seed)
}

/// Sine whose pitch wanders ±`depth` (a fraction of `base_hz`) at `rate_hz`.
pub(super) fn vibrato_tone(
    duration: f32,
    sr: f32,
    base_hz: f32,
    rate_hz: f32,
    depth: f32,
    amplitude: f32,
    lfo_phase: f32,
) -> SampleBuffer {
    let len = samples_for(duration, sr);
    let mut lfo = Lfo::new(sr, rate_hz).with_phase(lfo_phase);
    let mut phase = 0.0f32;
    SampleBuffer::from_fn(len, sr, |_| {
        let freq = base_hz * (1.0 + depth * lfo.next());
        let out = sinf(TAU * phase);
        phase = (phase + freq / sr).fract();
        out * amplitude
    })
}

/// Cluster of inharmonic partials with vibrato and a pulsing swell.
///
/// Used for both flange squeal (curves) and brake squeal.
pub(super) fn squeal(
    duration: f32,
    sr: f32,
    partials_hz: &[f32],
    pulse_hz: f32,
    level: f32,
    draws: &mut Draws,
) -> SampleBuffer {
    let len = samples_for(duration, sr);
    let mut acc = vec![0.0f32; len];
    let count = partials_hz.len().max(1) as f32;
    for (i, &base) in partials_hz.iter().enumerate() {
        let jitter = draws.uniform(0.97, 1.03);
        let vib_rate = draws.uniform(4.5, 7.0);
        let vib_phase = draws.uniform(0.0, 1.0);
        // Upper partials are progressively quieter.
        let weight = 1.0 / (1.0 + i as f32 * 0.6);
        let tone = vibrato_tone(
            duration,
            sr,
            base * jitter,
            vib_rate,
            0.012,
            weight / count,
            vib_phase,
        );
        for (a, s) in acc.iter_mut().zip(tone.samples()) {
            *a += s;
        }
    }
    let pulse_phase = draws.uniform(0.0, 1.0);
    let body = SampleBuffer::from_vec(acc, sr).normalized(level);
    let pulsed = amplitude_modulate(body, pulse_hz, 0.6, LfoWaveform::Sine, pulse_phase);
    envelope_apply(pulsed, &swell())
}

/// Traction loss: a rapidly frequency-modulated tone over chattering grit.
pub(super) fn wheel_slip(duration: f32, sr: f32, level: f32, draws: &mut Draws) -> SampleBuffer {
    let carrier = draws.uniform(1000.0, 1250.0);
    let fm_rate = draws.uniform(18.0, 28.0);
    let chatter_rate = draws.uniform(14.0, 20.0);
    let grit_seed = draws.seed();

    let tone = vibrato_tone(duration, sr, carrier, fm_rate, 0.27, level * 0.6, 0.0);
    let grit = noise(duration, sr, NoiseBand::band(200.0, 800.0), level * 0.6, grit_seed);
    let grit = amplitude_modulate(grit, chatter_rate, 0.9, LfoWaveform::Square, 0.0);
    let mixed = SampleBuffer::from_fn(tone.len(), sr, |n| {
        tone.samples()[n] + grit.samples().get(n).copied().unwrap_or(0.0)
    });
    envelope_apply(mixed, &Envelope::fade(0.05))
}

/// Low-speed grinding, 60–300 Hz.
pub(super) fn grinding(duration: f32, sr: f32, amplitude: f32, seed: u64) -> SampleBuffer {
    noise(duration, sr, NoiseBand::band(60.0, 300.0), amplitude, seed)
}
