//! Sound events: the unit of work the sequencer hands to the builders.

use crate::Phase;
use core::fmt;
use metro_core::{ParamRange, samples_for};

/// Cruising ambience segment length.
pub const CRUISING_SECS: ParamRange = ParamRange::new("cruising_secs", 10.0, 18.0);
/// Curve segment length.
pub const CURVE_SECS: ParamRange = ParamRange::new("curve_secs", 2.5, 4.0);
/// Acceleration segment length.
pub const ACCELERATION_SECS: ParamRange = ParamRange::new("acceleration_secs", 3.8, 4.2);
/// Deceleration segment length.
pub const DECELERATION_SECS: ParamRange = ParamRange::new("deceleration_secs", 3.3, 3.7);
/// Station idle segment length.
pub const STATION_IDLE_SECS: ParamRange = ParamRange::new("station_idle_secs", 2.0, 3.0);
/// Door sequence length. Fixed by its chime/air/motor/seal timeline.
pub const DOOR_SEQUENCE_SECS: f32 = 3.28;
/// Event intensity.
pub const INTENSITY: ParamRange = ParamRange::new("intensity", 0.0, 1.0);
/// Implied vehicle speed.
pub const SPEED_KMH: ParamRange = ParamRange::new("speed_kmh", 0.0, 120.0);

/// What a segment sounds like, plus the random decisions that shape it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Steady running between stations.
    Cruising {
        /// Cross a set of points part-way through.
        switch_crossing: bool,
        /// Hit a rail defect part-way through.
        rail_defect: bool,
    },
    /// A bend, optionally with wheel-flange squeal.
    Curve {
        /// Flange squeal layer present.
        flange_squeal: bool,
    },
    /// Chimes, air release, door travel and seal.
    DoorSequence,
    /// Pulling away from a platform.
    Acceleration {
        /// Momentary loss of traction.
        wheel_slip: bool,
    },
    /// Braking into a platform.
    Deceleration {
        /// Brake squeal layer present.
        brake_squeal: bool,
    },
    /// Standing at the platform with doors open.
    StationIdle,
}

impl EventKind {
    /// Short snake-case name.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Cruising { .. } => "cruising",
            EventKind::Curve { .. } => "curve",
            EventKind::DoorSequence => "door_sequence",
            EventKind::Acceleration { .. } => "acceleration",
            EventKind::Deceleration { .. } => "deceleration",
            EventKind::StationIdle => "station_idle",
        }
    }

    /// Allowed duration range for this kind.
    pub fn duration_range(&self) -> ParamRange {
        match self {
            EventKind::Cruising { .. } => CRUISING_SECS,
            EventKind::Curve { .. } => CURVE_SECS,
            EventKind::DoorSequence => {
                ParamRange::new("door_sequence_secs", DOOR_SEQUENCE_SECS, DOOR_SEQUENCE_SECS)
            }
            EventKind::Acceleration { .. } => ACCELERATION_SECS,
            EventKind::Deceleration { .. } => DECELERATION_SECS,
            EventKind::StationIdle => STATION_IDLE_SECS,
        }
    }
}

/// One scheduled segment.
///
/// Every parameter is fixed when the event is created. The `seed` drives all
/// randomness inside the builder, so rendering the same event twice yields
/// identical samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    /// Phase the event belongs to.
    pub phase: Phase,
    /// Kind and its feature flags.
    pub kind: EventKind,
    /// Length in seconds, inside `kind.duration_range()`.
    pub duration_secs: f32,
    /// Loudness/character scaler in [0, 1].
    pub intensity: f32,
    /// Implied speed at the start of the segment.
    pub start_speed_kmh: f32,
    /// Implied speed at the end of the segment.
    pub end_speed_kmh: f32,
    /// Seed for the builder's random stream.
    pub seed: u64,
}

impl SoundEvent {
    /// Create an event, clamping duration, intensity and speeds into range.
    pub fn new(
        phase: Phase,
        kind: EventKind,
        duration_secs: f32,
        intensity: f32,
        speed_kmh: (f32, f32),
        seed: u64,
    ) -> Self {
        Self {
            phase,
            kind,
            duration_secs: kind.duration_range().clamp(duration_secs),
            intensity: INTENSITY.clamp(intensity),
            start_speed_kmh: SPEED_KMH.clamp(speed_kmh.0),
            end_speed_kmh: SPEED_KMH.clamp(speed_kmh.1),
            seed,
        }
    }

    /// Rendered length in samples.
    pub fn sample_len(&self, sample_rate: f32) -> usize {
        samples_for(self.duration_secs, sample_rate)
    }

    /// Mean implied speed over the segment.
    pub fn mean_speed_kmh(&self) -> f32 {
        (self.start_speed_kmh + self.end_speed_kmh) * 0.5
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<14} {:>5.2}s  intensity {:.2}  {:>5.1} -> {:>5.1} km/h",
            self.phase,
            self.kind.name(),
            self.duration_secs,
            self.intensity,
            self.start_speed_kmh,
            self.end_speed_kmh
        )?;
        match self.kind {
            EventKind::Cruising {
                switch_crossing,
                rail_defect,
            } => {
                if switch_crossing {
                    f.write_str("  +switch")?;
                }
                if rail_defect {
                    f.write_str("  +rail-defect")?;
                }
            }
            EventKind::Curve {
                flange_squeal: true,
            } => f.write_str("  +flange-squeal")?,
            EventKind::Acceleration { wheel_slip: true } => f.write_str("  +wheel-slip")?,
            EventKind::Deceleration { brake_squeal: true } => f.write_str("  +brake-squeal")?,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range_values() {
        let event = SoundEvent::new(
            Phase::Cruising,
            EventKind::Cruising {
                switch_crossing: false,
                rail_defect: false,
            },
            99.0,
            1.7,
            (-5.0, 500.0),
            1,
        );
        assert_eq!(event.duration_secs, 18.0);
        assert_eq!(event.intensity, 1.0);
        assert_eq!(event.start_speed_kmh, 0.0);
        assert_eq!(event.end_speed_kmh, 120.0);
    }

    #[test]
    fn door_sequence_duration_is_fixed() {
        let event = SoundEvent::new(
            Phase::Departure,
            EventKind::DoorSequence,
            1.0,
            0.8,
            (0.0, 0.0),
            1,
        );
        assert_eq!(event.duration_secs, DOOR_SEQUENCE_SECS);
    }

    #[test]
    fn display_lists_flags() {
        let event = SoundEvent::new(
            Phase::Arrival,
            EventKind::Deceleration { brake_squeal: true },
            3.5,
            0.8,
            (70.0, 0.0),
            1,
        );
        let line = event.to_string();
        assert!(line.starts_with("arrival"));
        assert!(line.contains("deceleration"));
        assert!(line.contains("+brake-squeal"));
    }
}
