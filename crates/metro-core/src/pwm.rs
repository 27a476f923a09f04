//! Pulse-width-modulated carriers for traction inverter whine.
//!
//! IGBT inverters switch in the 3–8 kHz region. The carrier here wanders
//! slowly inside a frequency window while its duty cycle breathes around a
//! centre value. Edges are band-limited with 4th-order PolyBLEP.

use crate::{Lfo, NoiseSource, ParamRange, SampleBuffer, samples_for};

/// Allowed carrier band in Hz.
pub const PWM_CARRIER: ParamRange = ParamRange::new("pwm_carrier_hz", 3_000.0, 8_000.0);

/// Duty-cycle and carrier motion for [`pwm`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmModulation {
    /// Centre duty cycle, 0.05–0.95.
    pub duty: f32,
    /// Duty deviation either side of the centre.
    pub duty_depth: f32,
    /// Rate of both duty and carrier motion in Hz.
    pub rate_hz: f32,
}

impl Default for PwmModulation {
    fn default() -> Self {
        Self {
            duty: 0.5,
            duty_depth: 0.2,
            rate_hz: 0.7,
        }
    }
}

/// Generate a PWM carrier wandering inside `carrier_range_hz`.
///
/// Both carrier edges are clamped into [`PWM_CARRIER`]. `seed` sets the
/// starting phase of the wander so neighbouring layers do not move in step.
pub fn pwm(
    duration_secs: f32,
    sample_rate: f32,
    carrier_range_hz: (f32, f32),
    modulation: PwmModulation,
    amplitude: f32,
    seed: u64,
) -> SampleBuffer {
    let len = samples_for(duration_secs, sample_rate);
    let lo = PWM_CARRIER.clamp(carrier_range_hz.0.min(carrier_range_hz.1));
    let hi = PWM_CARRIER.clamp(carrier_range_hz.0.max(carrier_range_hz.1));
    let centre = modulation.duty.clamp(0.05, 0.95);
    let depth = modulation.duty_depth.abs().min(centre - 0.02).min(0.98 - centre);

    let mut rng = NoiseSource::new(seed);
    let mut wander = Lfo::new(sample_rate, modulation.rate_hz).with_phase(rng.next_unipolar());
    let mut breathe =
        Lfo::new(sample_rate, modulation.rate_hz * 1.37).with_phase(rng.next_unipolar());
    let mut phase = 0.0f32;

    SampleBuffer::from_fn(len, sample_rate, |_| {
        let freq = lo + (hi - lo) * wander.next_unipolar();
        let duty = centre + depth * breathe.next();
        let dt = freq / sample_rate;

        let naive = if phase < duty { 1.0 } else { -1.0 };
        let out = naive + poly_blep(phase, dt) - poly_blep((phase - duty + 1.0).fract(), dt);

        phase += dt;
        if phase >= 1.0 {
            phase -= 1.0;
        }
        out * amplitude
    })
}

/// 4th-order PolyBLEP (Polynomial Band-Limited Step) correction.
///
/// C²-continuous, degree-4 piecewise polynomial spanning two samples either
/// side of a discontinuity, roughly 50 dB of alias suppression.
///
/// Reference: Välimäki et al., "Antialiasing Oscillators", IEEE Signal
/// Processing Magazine, 2010.
///
/// # Arguments
/// * `t` - Current phase position in [0.0, 1.0)
/// * `dt` - Phase increment per sample (frequency / sample_rate)
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    const A4: f32 = -43.0 / 48.0;
    const A3: f32 = 7.0 / 6.0;
    const A2: f32 = 0.5;
    const A0: f32 = -1.0;
    const C: f32 = -11.0 / 48.0;

    let dt2 = 2.0 * dt;
    let poly = |n: f32| {
        if n < 1.0 {
            let n2 = n * n;
            A4 * n2 * n2 + A3 * n2 * n + A2 * n2 + A0
        } else {
            let u = 2.0 - n;
            let u2 = u * u;
            C * u2 * u2
        }
    };

    if t < dt2 {
        poly(t / dt)
    } else if t > 1.0 - dt2 {
        -poly((1.0 - t) / dt)
    } else {
        0.0
    }
}
