//! Mathematical utility functions for the signal primitives.
//!
//! # Limiting
//!
//! | Function | Character | Use Case |
//! |----------|-----------|----------|
//! | [`soft_limit`] | Transparent below threshold, tanh knee above | Layer summation, mixer output |
//! | [`quantize_i16`] | Saturating | Last step before the sink |
//!
//! [`equal_power_gains`] gives the fade-out / fade-in pair for cross-fades.

use core::f32::consts::FRAC_PI_2;
use libm::{cosf, sinf, tanhf};

/// Default threshold where [`soft_limit`] starts bending the signal.
pub const LIMIT_THRESHOLD: f32 = 0.9;

/// Soft limiter with a tanh knee.
///
/// Identity for `|x| <= threshold`. Above the threshold the excess is squashed
/// into the remaining headroom:
///
/// ```text
/// y = sign(x) * (t + (1 - t) * tanh((|x| - t) / (1 - t)))
/// ```
///
/// The curve is continuous with slope 1 at the knee and never exceeds ±1.
///
/// # Example
/// ```rust
/// use metro_core::soft_limit;
///
/// assert_eq!(soft_limit(0.5, 0.9), 0.5);
/// assert!(soft_limit(4.0, 0.9) <= 1.0);
/// assert!(soft_limit(0.95, 0.9) < 0.95);
/// ```
#[inline]
pub fn soft_limit(x: f32, threshold: f32) -> f32 {
    let t = threshold.clamp(0.0, 0.999);
    let mag = x.abs();
    if mag <= t {
        return x;
    }
    let headroom = 1.0 - t;
    let bent = t + headroom * tanhf((mag - t) / headroom);
    bent.copysign(x)
}

/// Quantize a normalized sample to 16-bit signed PCM.
///
/// Input is clamped to [-1, 1] first, so out-of-range or non-finite values
/// saturate instead of wrapping.
///
/// ```rust
/// use metro_core::quantize_i16;
///
/// assert_eq!(quantize_i16(1.0), i16::MAX);
/// assert_eq!(quantize_i16(-3.0), -i16::MAX);
/// assert_eq!(quantize_i16(f32::NAN), 0);
/// ```
#[inline]
pub fn quantize_i16(x: f32) -> i16 {
    if !x.is_finite() {
        return 0;
    }
    (x.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

/// Equal-power cross-fade gains at position `t` in [0, 1].
///
/// Returns `(fade_out, fade_in)` = `(cos(t·π/2), sin(t·π/2))`. The squared
/// gains always sum to 1, so uncorrelated material keeps constant loudness
/// through the fade.
#[inline]
pub fn equal_power_gains(t: f32) -> (f32, f32) {
    let angle = t.clamp(0.0, 1.0) * FRAC_PI_2;
    (cosf(angle), sinf(angle))
}

/// Flush denormals to zero.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
