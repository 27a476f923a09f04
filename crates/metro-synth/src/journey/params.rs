//! Tunable journey parameters.

use crate::Conditions;

/// Probabilities the sequencer rolls against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventOdds {
    /// Chance a cruising decision turns into a curve.
    pub curve: f32,
    /// Chance a cruising decision heads for the next station once the
    /// cruising window has opened.
    pub arrival: f32,
    /// Chance a curve carries flange squeal.
    pub flange_squeal: f32,
    /// Chance a pull-away includes wheel slip.
    pub wheel_slip: f32,
    /// Chance a stop includes brake squeal.
    pub brake_squeal: f32,
    /// Chance a cruising segment crosses a set of points.
    pub switch_crossing: f32,
    /// Base chance a cruising segment hits a rail defect, before track wear.
    pub rail_defect: f32,
}

impl Default for EventOdds {
    fn default() -> Self {
        Self {
            curve: 0.25,
            arrival: 0.15,
            flange_squeal: 0.30,
            wheel_slip: 0.20,
            brake_squeal: 0.25,
            switch_crossing: 0.12,
            rail_defect: 0.10,
        }
    }
}

impl EventOdds {
    /// Copy with every probability clamped to [0, 1] and `curve + arrival`
    /// kept at or below 1.
    pub fn clamped(self) -> Self {
        let p = |x: f32| if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
        let curve = p(self.curve);
        Self {
            curve,
            arrival: p(self.arrival).min(1.0 - curve),
            flange_squeal: p(self.flange_squeal),
            wheel_slip: p(self.wheel_slip),
            brake_squeal: p(self.brake_squeal),
            switch_crossing: p(self.switch_crossing),
            rail_defect: p(self.rail_defect),
        }
    }
}

/// Everything the sequencer needs besides its seed and budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyParams {
    /// Cumulative cruising time before arrival, `(min, max)` seconds.
    pub cruise_window_secs: (f32, f32),
    /// Line speed drawn per leg, `(min, max)` km/h.
    pub cruise_speed_kmh: (f32, f32),
    /// Speed through curves as a fraction of line speed.
    pub curve_speed_factor: f32,
    /// Probabilities.
    pub odds: EventOdds,
    /// Fixed conditions for the run.
    pub conditions: Conditions,
}

impl Default for JourneyParams {
    fn default() -> Self {
        Self {
            cruise_window_secs: (25.0, 45.0),
            cruise_speed_kmh: (60.0, 80.0),
            curve_speed_factor: 0.8,
            odds: EventOdds::default(),
            conditions: Conditions::default(),
        }
    }
}

impl JourneyParams {
    /// Copy with every field pulled into a usable range.
    pub fn clamped(self) -> Self {
        let (w0, w1) = ordered(self.cruise_window_secs, 0.0, 600.0);
        let (s0, s1) = ordered(self.cruise_speed_kmh, 5.0, 120.0);
        Self {
            cruise_window_secs: (w0, w1),
            cruise_speed_kmh: (s0, s1),
            curve_speed_factor: self.curve_speed_factor.clamp(0.3, 1.0),
            odds: self.odds.clamped(),
            conditions: self.conditions.clamped(),
        }
    }
}

fn ordered((a, b): (f32, f32), lo: f32, hi: f32) -> (f32, f32) {
    let a = if a.is_finite() { a.clamp(lo, hi) } else { lo };
    let b = if b.is_finite() { b.clamp(lo, hi) } else { hi };
    (a.min(b), a.max(b))
}
