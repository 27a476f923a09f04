//! Sub-audio oscillator behind track wobble, squeal pulsing and relay gating.

use core::f32::consts::TAU;
use libm::sinf;

/// Shape of one LFO cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth swing; bogie sway and hull vibration.
    #[default]
    Sine,
    /// Linear up and down.
    Triangle,
    /// Rising ramp with a snap back.
    Saw,
    /// On/off gating, e.g. compressor cycling.
    Square,
}

impl LfoWaveform {
    /// Bipolar value at `phase` in [0, 1).
    #[inline]
    pub fn at(self, phase: f32) -> f32 {
        match self {
            LfoWaveform::Sine => sinf(phase * TAU),
            LfoWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            LfoWaveform::Saw => 2.0 * phase - 1.0,
            LfoWaveform::Square if phase < 0.5 => 1.0,
            LfoWaveform::Square => -1.0,
        }
    }
}

/// Phase-accumulating low-frequency oscillator.
///
/// Rates run from a fraction of a hertz (carrier wander) to a few tens of
/// hertz (squeal pulsing). Output is bipolar in [-1, 1].
///
/// ```rust
/// use metro_core::{Lfo, LfoWaveform};
///
/// let mut sway = Lfo::new(44100.0, 3.0).with_waveform(LfoWaveform::Triangle);
/// assert!((-1.0..=1.0).contains(&sway.next()));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    step: f32,
    waveform: LfoWaveform,
}

impl Lfo {
    /// Sine LFO at `rate_hz`, starting at phase 0.
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        Self {
            phase: 0.0,
            step: (rate_hz / sample_rate).abs(),
            waveform: LfoWaveform::Sine,
        }
    }

    /// Use another cycle shape.
    pub fn with_waveform(mut self, waveform: LfoWaveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Start at `phase` (wrapped into [0, 1)); 0.5 is half a cycle in.
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase.rem_euclid(1.0);
        self
    }

    /// Current value, then advance one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let out = self.waveform.at(self.phase);
        self.phase = (self.phase + self.step).fract();
        out
    }

    /// Like [`next`](Self::next), mapped to [0, 1].
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        0.5 * (self.next() + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    #[test]
    fn three_hertz_sway_repeats_each_third_of_a_second() {
        let mut lfo = Lfo::new(SR, 3.0);
        let period = (SR / 3.0) as usize;
        let first: Vec<f32> = (0..64).map(|_| lfo.next()).collect();
        for _ in 64..period {
            lfo.next();
        }
        let again: Vec<f32> = (0..64).map(|_| lfo.next()).collect();
        for (a, b) in first.iter().zip(&again) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn every_shape_stays_bipolar() {
        for waveform in [
            LfoWaveform::Sine,
            LfoWaveform::Triangle,
            LfoWaveform::Saw,
            LfoWaveform::Square,
        ] {
            let mut lfo = Lfo::new(SR, 7.0).with_waveform(waveform);
            for _ in 0..10_000 {
                let v = lfo.next();
                assert!((-1.0..=1.0).contains(&v), "{waveform:?} gave {v}");
            }
        }
    }

    #[test]
    fn triangle_hits_its_corners() {
        let t = LfoWaveform::Triangle;
        assert!((t.at(0.0) + 1.0).abs() < 1e-6);
        assert!((t.at(0.25)).abs() < 1e-6);
        assert!((t.at(0.5) - 1.0).abs() < 1e-6);
        assert!((t.at(0.75)).abs() < 1e-6);
    }

    #[test]
    fn half_cycle_offset_inverts_a_sine() {
        let mut a = Lfo::new(SR, 2.0).with_phase(0.25);
        let mut b = Lfo::new(SR, 2.0).with_phase(0.75);
        assert!((a.next() + b.next()).abs() < 1e-5);
    }

    #[test]
    fn square_gate_spends_half_the_time_open() {
        let mut gate = Lfo::new(SR, 1.0).with_waveform(LfoWaveform::Square);
        let open = (0..44100).filter(|_| gate.next_unipolar() > 0.5).count();
        assert!((open as i32 - 22050).abs() < 10);
    }
}
