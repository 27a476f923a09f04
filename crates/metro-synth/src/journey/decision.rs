//! Pure branching decisions.
//!
//! The sequencer draws one uniform number in [0, 1) per decision and hands it
//! here together with the journey's progress. Nothing in this module touches
//! a random generator, so every branch is testable with a literal draw.
//!
//! After each cruising or curve segment:
//!
//! ```text
//! remaining <= 0                                  → Arrive
//! elapsed >= window_min && remaining < min_cruise → Arrive   (another cruise would overshoot)
//! draw < curve && !after_curve && room for curve  → Curve
//! draw < curve + arrival && elapsed >= window_min → Arrive
//! otherwise                                       → Continue
//! ```

use super::EventOdds;

/// What happens after a cruising or curve segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CruiseDecision {
    /// Another plain cruising segment.
    Continue,
    /// Enter a curve.
    Curve,
    /// Start braking for the next station.
    Arrive,
}

/// Cruising progress on the current leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CruiseProgress {
    /// Cruising plus curve time accumulated on this leg.
    pub elapsed_secs: f32,
    /// This leg's drawn target inside the window.
    pub target_secs: f32,
    /// Earliest point at which arrival may be chosen.
    pub window_min_secs: f32,
    /// Shortest cruising segment the sequencer can emit.
    pub min_cruise_secs: f32,
    /// Longest curve segment the sequencer can emit.
    pub max_curve_secs: f32,
    /// The segment just finished was a curve.
    pub after_curve: bool,
}

impl CruiseProgress {
    /// Seconds left before the target.
    pub fn remaining_secs(&self) -> f32 {
        self.target_secs - self.elapsed_secs
    }
}

/// Decide the next step from progress and one uniform draw.
///
/// ```rust
/// use metro_synth::{CruiseDecision, CruiseProgress, EventOdds, decide_after_cruise};
///
/// let progress = CruiseProgress {
///     elapsed_secs: 12.0,
///     target_secs: 35.0,
///     window_min_secs: 25.0,
///     min_cruise_secs: 10.0,
///     max_curve_secs: 4.0,
///     after_curve: false,
/// };
/// let odds = EventOdds::default();
/// assert_eq!(decide_after_cruise(&progress, 0.10, &odds), CruiseDecision::Curve);
/// assert_eq!(decide_after_cruise(&progress, 0.30, &odds), CruiseDecision::Continue);
/// assert_eq!(decide_after_cruise(&progress, 0.90, &odds), CruiseDecision::Continue);
/// ```
pub fn decide_after_cruise(
    progress: &CruiseProgress,
    draw: f32,
    odds: &EventOdds,
) -> CruiseDecision {
    let remaining = progress.remaining_secs();
    let window_open = progress.elapsed_secs >= progress.window_min_secs;

    if remaining <= 0.0 {
        return CruiseDecision::Arrive;
    }
    if window_open && remaining < progress.min_cruise_secs {
        return CruiseDecision::Arrive;
    }
    if draw < odds.curve && !progress.after_curve && remaining >= progress.max_curve_secs {
        return CruiseDecision::Curve;
    }
    if draw < odds.curve + odds.arrival && window_open {
        return CruiseDecision::Arrive;
    }
    CruiseDecision::Continue
}

/// Bernoulli roll: true with probability `probability` for a uniform draw.
#[inline]
pub fn roll(draw: f32, probability: f32) -> bool {
    draw < probability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(elapsed: f32, target: f32, after_curve: bool) -> CruiseProgress {
        CruiseProgress {
            elapsed_secs: elapsed,
            target_secs: target,
            window_min_secs: 25.0,
            min_cruise_secs: 10.0,
            max_curve_secs: 4.0,
            after_curve,
        }
    }

    #[test]
    fn target_reached_always_arrives() {
        let odds = EventOdds::default();
        for draw in [0.0, 0.2, 0.5, 0.99] {
            assert_eq!(
                decide_after_cruise(&progress(40.0, 38.0, false), draw, &odds),
                CruiseDecision::Arrive
            );
        }
    }

    #[test]
    fn no_arrival_before_window_opens() {
        let odds = EventOdds::default();
        assert_eq!(
            decide_after_cruise(&progress(14.0, 40.0, false), 0.3, &odds),
            CruiseDecision::Continue
        );
        assert_eq!(
            decide_after_cruise(&progress(26.0, 40.0, false), 0.3, &odds),
            CruiseDecision::Arrive
        );
    }

    #[test]
    fn curves_never_follow_curves() {
        let odds = EventOdds::default();
        assert_eq!(
            decide_after_cruise(&progress(14.0, 40.0, true), 0.1, &odds),
            CruiseDecision::Continue
        );
    }

    #[test]
    fn no_curve_without_room_before_target() {
        let odds = EventOdds::default();
        assert_eq!(
            decide_after_cruise(&progress(20.0, 22.0, false), 0.1, &odds),
            CruiseDecision::Continue
        );
    }

    #[test]
    fn short_remainder_inside_window_arrives() {
        let odds = EventOdds::default();
        assert_eq!(
            decide_after_cruise(&progress(30.0, 36.0, false), 0.9, &odds),
            CruiseDecision::Arrive
        );
    }

    #[test]
    fn roll_matches_probability_edges() {
        assert!(roll(0.0, 0.3));
        assert!(roll(0.2999, 0.3));
        assert!(!roll(0.3, 0.3));
        assert!(!roll(0.5, 0.0));
    }
}
