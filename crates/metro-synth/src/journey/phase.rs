//! Journey phases and their legal transitions.
//!
//! ```text
//! Departure ──► Cruising ◄──► Curve
//!                  │  ▲         │
//!                  │  └─(self)  │
//!                  ▼            ▼
//!               Arrival ◄───────┘
//!                  │
//!                  ▼
//!                Dwell ──► Departure ...
//! ```

use core::fmt;

/// Where the train is in its station-to-station cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Doors close and the train pulls away.
    #[default]
    Departure,
    /// Steady running between stations.
    Cruising,
    /// A bend in the tunnel; a sub-branch of cruising.
    Curve,
    /// Braking into the next station.
    Arrival,
    /// Standing at the platform.
    Dwell,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 5] = [
        Phase::Departure,
        Phase::Cruising,
        Phase::Curve,
        Phase::Arrival,
        Phase::Dwell,
    ];

    /// True if the sequencer may move from `self` to `next`.
    ///
    /// ```rust
    /// use metro_synth::Phase;
    ///
    /// assert!(Phase::Cruising.can_transition_to(Phase::Curve));
    /// assert!(Phase::Curve.can_transition_to(Phase::Arrival));
    /// assert!(!Phase::Dwell.can_transition_to(Phase::Cruising));
    /// ```
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::{Arrival, Cruising, Curve, Departure, Dwell};
        matches!(
            (self, next),
            (Departure, Cruising)
                | (Cruising, Cruising | Curve | Arrival)
                | (Curve, Cruising | Arrival)
                | (Arrival, Dwell)
                | (Dwell, Departure)
        )
    }

    /// Lower-case name used in logs and the schedule printout.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Departure => "departure",
            Phase::Cruising => "cruising",
            Phase::Curve => "curve",
            Phase::Arrival => "arrival",
            Phase::Dwell => "dwell",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phase_has_a_successor() {
        for phase in Phase::ALL {
            assert!(
                Phase::ALL.iter().any(|&next| phase.can_transition_to(next)),
                "{phase} is a dead end"
            );
        }
    }

    #[test]
    fn arrival_only_from_running_phases() {
        let sources: Vec<_> = Phase::ALL
            .iter()
            .copied()
            .filter(|p| p.can_transition_to(Phase::Arrival))
            .collect();
        assert_eq!(sources, vec![Phase::Cruising, Phase::Curve]);
    }

    #[test]
    fn curve_does_not_repeat() {
        assert!(!Phase::Curve.can_transition_to(Phase::Curve));
    }
}
