//! Property-based tests for metro-core signal primitives.
//!
//! Every generator must honour the length contract (`round(duration × rate)`)
//! and keep its samples inside [-1, 1] for any parameters in its domain.

use metro_core::{
    ClickInterval, ClickShape, Envelope, LayerMix, NoiseBand, PwmModulation, SweepShape,
    envelope_apply, harmonic_stack, noise, periodic_click, pwm, quantize_i16, samples_for,
    soft_limit, sweep,
};
use proptest::prelude::*;

const SR: f32 = 44100.0;

fn in_unit_range(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.is_finite() && (-1.0..=1.0).contains(s))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Band-limited noise has the requested length and never exceeds its amplitude.
    #[test]
    fn noise_length_and_range(
        duration in 0.0f32..0.3,
        low in 20.0f32..4000.0,
        width in 10.0f32..8000.0,
        amplitude in 0.0f32..1.0,
        seed in any::<u64>(),
    ) {
        let buf = noise(duration, SR, NoiseBand::band(low, low + width), amplitude, seed);
        prop_assert_eq!(buf.len(), samples_for(duration, SR));
        prop_assert!(buf.peak() <= amplitude + 1e-5);
        prop_assert!(in_unit_range(buf.samples()));
    }

    /// Sweeps stay bounded for any endpoint pair and shape.
    #[test]
    fn sweep_length_and_range(
        duration in 0.0f32..0.3,
        start in 20.0f32..10000.0,
        end in 20.0f32..10000.0,
        exponential in any::<bool>(),
        amplitude in 0.0f32..1.0,
    ) {
        let shape = if exponential { SweepShape::Exponential } else { SweepShape::Linear };
        let buf = sweep(duration, SR, start, end, shape, amplitude);
        prop_assert_eq!(buf.len(), samples_for(duration, SR));
        prop_assert!(buf.peak() <= amplitude + 1e-5);
    }

    /// Harmonic stacks are normalized by their gain sum.
    #[test]
    fn harmonic_stack_bounded(
        fundamental in 30.0f32..2000.0,
        gains in prop::collection::vec(0.0f32..1.0, 1..8),
        amplitude in 0.0f32..1.0,
    ) {
        let buf = harmonic_stack(0.1, SR, fundamental, &gains, amplitude);
        prop_assert!(buf.peak() <= amplitude + 1e-5);
    }

    /// PWM stays bounded for any carrier request, in band or not.
    #[test]
    fn pwm_bounded(
        lo in 0.0f32..12000.0,
        hi in 0.0f32..12000.0,
        duty in 0.0f32..1.0,
        depth in 0.0f32..1.0,
        seed in any::<u64>(),
    ) {
        let modulation = PwmModulation { duty, duty_depth: depth, rate_hz: 1.0 };
        let buf = pwm(0.05, SR, (lo, hi), modulation, 0.8, seed);
        prop_assert!(buf.peak() <= 0.8 + 1e-4);
    }

    /// Clicks never leave the unit range, however dense.
    #[test]
    fn clicks_bounded(
        speed in 0.0f32..200.0,
        amplitude in 0.0f32..1.0,
        seed in any::<u64>(),
    ) {
        let interval = ClickInterval::SpeedScaled { spacing_m: 2.5, speed_kmh: speed };
        let shape = ClickShape::Double { spacing_secs: 0.01, decay_secs: 0.02 };
        let buf = periodic_click(0.5, SR, interval, shape, amplitude, seed);
        prop_assert!(in_unit_range(buf.samples()));
    }

    /// Envelopes only ever attenuate.
    #[test]
    fn envelope_never_amplifies(
        from in -1.0f32..2.0,
        to in -1.0f32..2.0,
        tau in 0.001f32..1.0,
    ) {
        let tone = sweep(0.1, SR, 440.0, 440.0, SweepShape::Linear, 0.7);
        for env in [
            Envelope::Linear { from, to },
            Envelope::ExponentialDecay { tau_secs: tau },
            Envelope::AttackDecay { attack_secs: tau * 0.1, tau_secs: tau },
        ] {
            let shaped = envelope_apply(tone.clone(), &env);
            for (a, b) in shaped.samples().iter().zip(tone.samples()) {
                prop_assert!(a.abs() <= b.abs() + 1e-6);
            }
        }
    }

    /// Summing arbitrarily many loud layers still lands inside [-1, 1].
    #[test]
    fn layer_mix_is_limited(layers in 1usize..12, gain in 0.0f32..3.0) {
        let mut mix = LayerMix::new(0.05, SR);
        for i in 0..layers {
            mix.add(&noise(0.05, SR, NoiseBand::Broadband, 1.0, i as u64), gain);
        }
        let out = mix.finish(0.9);
        prop_assert!(in_unit_range(out.samples()));
    }

    /// Soft limiting followed by quantization never wraps around.
    #[test]
    fn quantize_preserves_sign(x in -100.0f32..100.0) {
        let q = quantize_i16(soft_limit(x, 0.9));
        if x > 1e-3 {
            prop_assert!(q > 0);
        } else if x < -1e-3 {
            prop_assert!(q < 0);
        }
    }
}
