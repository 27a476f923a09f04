//! The journey state machine.
//!
//! The sequencer owns the [`JourneyState`] and a seeded `Pcg64`; nothing else
//! mutates either. Each call to [`Sequencer::next_event`] hands out exactly
//! one [`SoundEvent`], stepping the phase machine when its queue is empty:
//!
//! | Phase | Emits | Next |
//! |-------|-------|------|
//! | Departure | door sequence, acceleration | Cruising |
//! | Cruising | cruising ambience | per [`decide_after_cruise`] |
//! | Curve | curve | per [`decide_after_cruise`] |
//! | Arrival | deceleration | Dwell |
//! | Dwell | station idle | Departure |
//!
//! The run budget is checked at event boundaries only: once audible time has
//! reached the budget no new event starts, but the one that crossed the line
//! was already handed out whole. Audible time equals emitted time unless a
//! splice overlap is set, in which case every event after the first is
//! counted without the window the mixer cross-fades away.

use super::{CruiseDecision, CruiseProgress, JourneyParams, decide_after_cruise, roll};
use crate::event::{
    ACCELERATION_SECS, CRUISING_SECS, CURVE_SECS, DECELERATION_SECS, DOOR_SEQUENCE_SECS,
    EventKind, STATION_IDLE_SECS,
};
use crate::rng::uniform;
use crate::{Phase, SoundEvent, WearState};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::VecDeque;

/// Mutable journey bookkeeping, owned by the [`Sequencer`].
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyState {
    /// Phase of the next event to be generated.
    pub phase: Phase,
    /// Seconds emitted so far in the phase of the latest event.
    pub phase_elapsed_secs: f32,
    /// Cruising plus curve time on the current leg.
    pub cruise_elapsed_secs: f32,
    /// Target cruising time for the current leg.
    pub cruise_target_secs: f32,
    /// Cruising time of the most recently completed leg.
    pub last_leg_cruise_secs: Option<f32>,
    /// Line speed drawn for the current leg.
    pub line_speed_kmh: f32,
    /// Implied speed at the end of the last emitted event.
    pub speed_kmh: f32,
    /// Distance covered since the start.
    pub distance_m: f64,
    /// Total audio time handed out.
    pub emitted_secs: f64,
    /// Audio time left once splice overlaps are taken out.
    pub audible_secs: f64,
    /// Number of events handed out.
    pub events_emitted: u64,
    /// Number of stations served (completed dwells).
    pub stations: u64,
    /// Whether the last running segment was a curve.
    pub after_curve: bool,
    /// Thermal and mechanical wear.
    pub wear: WearState,
}

impl JourneyState {
    fn new(params: &JourneyParams) -> Self {
        Self {
            phase: Phase::Departure,
            phase_elapsed_secs: 0.0,
            cruise_elapsed_secs: 0.0,
            cruise_target_secs: params.cruise_window_secs.1,
            last_leg_cruise_secs: None,
            line_speed_kmh: params.cruise_speed_kmh.0,
            speed_kmh: 0.0,
            distance_m: 0.0,
            emitted_secs: 0.0,
            audible_secs: 0.0,
            events_emitted: 0,
            stations: 0,
            after_curve: false,
            wear: WearState::new(params.conditions.temperature_c, &params.conditions),
        }
    }
}

/// How consecutive segments are joined downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Splice {
    sample_rate: f32,
    overlap: usize,
    audible_samples: u64,
}

/// Seeded journey sequencer.
///
/// ```rust
/// use metro_synth::{JourneyParams, Phase, Sequencer};
///
/// let mut seq = Sequencer::new(JourneyParams::default(), 42).with_budget_secs(30.0);
/// let first = seq.next_event().unwrap();
/// assert_eq!(first.phase, Phase::Departure);
/// let events: Vec<_> = std::iter::once(first).chain(seq).collect();
/// let total: f32 = events.iter().map(|e| e.duration_secs).sum();
/// assert!(total >= 30.0);
/// ```
#[derive(Debug, Clone)]
pub struct Sequencer {
    params: JourneyParams,
    state: JourneyState,
    rng: Pcg64,
    budget_secs: Option<f64>,
    queue: VecDeque<SoundEvent>,
    emitted_phase: Option<Phase>,
    splice: Option<Splice>,
}

impl Sequencer {
    /// Unbounded sequencer seeded with `seed`.
    pub fn new(params: JourneyParams, seed: u64) -> Self {
        let params = params.clamped();
        Self {
            state: JourneyState::new(&params),
            params,
            rng: Pcg64::seed_from_u64(seed),
            budget_secs: None,
            queue: VecDeque::new(),
            emitted_phase: None,
            splice: None,
        }
    }

    /// Stop issuing events once `secs` of audio have been handed out.
    pub fn with_budget_secs(mut self, secs: f64) -> Self {
        self.budget_secs = Some(if secs.is_finite() { secs.max(0.0) } else { 0.0 });
        self
    }

    /// Count the budget in audible samples at `sample_rate`, where every
    /// event after the first loses `overlap_samples` to a cross-fade.
    ///
    /// ```rust
    /// use metro_synth::{JourneyParams, Sequencer};
    ///
    /// let seq = Sequencer::new(JourneyParams::default(), 985)
    ///     .with_budget_secs(30.0)
    ///     .with_splice_overlap(44100.0, 3528);
    /// let events: Vec<_> = seq.collect();
    /// let samples: usize = events.iter().map(|e| e.sample_len(44100.0)).sum();
    /// let audible = samples - (events.len() - 1) * 3528;
    /// assert!(audible >= 30 * 44100);
    /// ```
    pub fn with_splice_overlap(mut self, sample_rate: f32, overlap_samples: usize) -> Self {
        self.splice = Some(Splice {
            sample_rate: sample_rate.max(1.0),
            overlap: overlap_samples,
            audible_samples: 0,
        });
        self
    }

    /// Journey parameters after clamping.
    pub fn params(&self) -> &JourneyParams {
        &self.params
    }

    /// Current journey state.
    pub fn state(&self) -> &JourneyState {
        &self.state
    }

    /// Run budget in seconds, if any.
    pub fn budget_secs(&self) -> Option<f64> {
        self.budget_secs
    }

    /// True once the budget is used up.
    pub fn is_exhausted(&self) -> bool {
        self.budget_secs
            .is_some_and(|budget| self.state.audible_secs >= budget)
    }

    /// Next event, or `None` when the budget is used up.
    pub fn next_event(&mut self) -> Option<SoundEvent> {
        if self.is_exhausted() {
            return None;
        }
        if self.queue.is_empty() {
            self.step();
        }
        let event = self.queue.pop_front()?;
        self.account(&event);
        Some(event)
    }

    /// Generate the events for the current phase and move to the next one.
    fn step(&mut self) {
        match self.state.phase {
            Phase::Departure => {
                let line = uniform(
                    &mut self.rng,
                    self.params.cruise_speed_kmh.0,
                    self.params.cruise_speed_kmh.1,
                );
                let (w0, w1) = self.params.cruise_window_secs;
                self.state.line_speed_kmh = line;
                self.state.cruise_target_secs = uniform(&mut self.rng, w0, w1);
                self.state.cruise_elapsed_secs = 0.0;
                self.state.after_curve = false;

                let door = self.event(
                    Phase::Departure,
                    EventKind::DoorSequence,
                    DOOR_SEQUENCE_SECS,
                    (0.0, 0.0),
                );
                let wheel_slip = self.chance(self.params.odds.wheel_slip);
                let secs = self.draw_secs(ACCELERATION_SECS.min, ACCELERATION_SECS.max);
                let accel = self.event(
                    Phase::Departure,
                    EventKind::Acceleration { wheel_slip },
                    secs,
                    (0.0, line),
                );
                self.queue.extend([door, accel]);
                self.transition(Phase::Cruising);
            }
            Phase::Cruising => {
                let switch_crossing = self.chance(self.params.odds.switch_crossing);
                let defect_odds =
                    self.params.odds.rail_defect * self.params.conditions.rail_defect_factor();
                let rail_defect = self.chance(defect_odds.min(1.0));
                let remaining = self.state.cruise_target_secs - self.state.cruise_elapsed_secs;
                let secs = self
                    .draw_secs(CRUISING_SECS.min, CRUISING_SECS.max)
                    .min(remaining)
                    .max(CRUISING_SECS.min);
                let speed = self.state.line_speed_kmh * uniform(&mut self.rng, 0.95, 1.05);
                let event = self.event(
                    Phase::Cruising,
                    EventKind::Cruising {
                        switch_crossing,
                        rail_defect,
                    },
                    secs,
                    (speed, speed),
                );
                self.queue.push_back(event);
                self.state.cruise_elapsed_secs += event.duration_secs;
                self.state.after_curve = false;
                self.decide();
            }
            Phase::Curve => {
                let flange_squeal = self.chance(self.params.odds.flange_squeal);
                let secs = self.draw_secs(CURVE_SECS.min, CURVE_SECS.max);
                let speed = self.state.line_speed_kmh * self.params.curve_speed_factor;
                let event = self.event_with_intensity(
                    Phase::Curve,
                    EventKind::Curve { flange_squeal },
                    secs,
                    (speed, speed),
                    (0.4, 0.8),
                );
                self.queue.push_back(event);
                self.state.cruise_elapsed_secs += event.duration_secs;
                self.state.after_curve = true;
                self.decide();
            }
            Phase::Arrival => {
                let brake_squeal = self.chance(self.params.odds.brake_squeal);
                let secs = self.draw_secs(DECELERATION_SECS.min, DECELERATION_SECS.max);
                let from = self.state.speed_kmh;
                let event = self.event(
                    Phase::Arrival,
                    EventKind::Deceleration { brake_squeal },
                    secs,
                    (from, 0.0),
                );
                self.queue.push_back(event);
                self.transition(Phase::Dwell);
            }
            Phase::Dwell => {
                let secs = self.draw_secs(STATION_IDLE_SECS.min, STATION_IDLE_SECS.max);
                let event = self.event(Phase::Dwell, EventKind::StationIdle, secs, (0.0, 0.0));
                self.queue.push_back(event);
                self.state.stations += 1;
                self.transition(Phase::Departure);
            }
        }
    }

    fn decide(&mut self) {
        let progress = CruiseProgress {
            elapsed_secs: self.state.cruise_elapsed_secs,
            target_secs: self.state.cruise_target_secs,
            window_min_secs: self.params.cruise_window_secs.0,
            min_cruise_secs: CRUISING_SECS.min,
            max_curve_secs: CURVE_SECS.max,
            after_curve: self.state.after_curve,
        };
        let draw: f32 = self.rng.random();
        let next = match decide_after_cruise(&progress, draw, &self.params.odds) {
            CruiseDecision::Continue => Phase::Cruising,
            CruiseDecision::Curve => Phase::Curve,
            CruiseDecision::Arrive => {
                self.state.last_leg_cruise_secs = Some(self.state.cruise_elapsed_secs);
                Phase::Arrival
            }
        };
        self.transition(next);
    }

    fn transition(&mut self, next: Phase) {
        let from = self.state.phase;
        debug_assert!(from.can_transition_to(next), "illegal transition {from} -> {next}");
        if from != next {
            tracing::debug!(%from, to = %next, "journey phase change");
        }
        self.state.phase = next;
    }

    /// Update bookkeeping for an event that is being handed out.
    fn account(&mut self, event: &SoundEvent) {
        let dt = event.duration_secs;
        let accel_mps2 = (event.end_speed_kmh - event.start_speed_kmh) / 3.6 / dt.max(1e-3);
        let braking = matches!(event.kind, EventKind::Deceleration { .. });
        let ambient = self.params.conditions.temperature_c;

        self.state
            .wear
            .advance(dt, event.mean_speed_kmh(), accel_mps2, braking, ambient);
        self.state.distance_m += f64::from(event.mean_speed_kmh() / 3.6 * dt);
        self.state.speed_kmh = event.end_speed_kmh;
        self.state.emitted_secs += f64::from(dt);
        self.state.audible_secs = match self.splice.as_mut() {
            Some(splice) => {
                let len = event.sample_len(splice.sample_rate);
                let overlap = if self.state.events_emitted == 0 {
                    0
                } else {
                    splice.overlap.min(len)
                };
                splice.audible_samples += (len - overlap) as u64;
                splice.audible_samples as f64 / f64::from(splice.sample_rate)
            }
            None => self.state.emitted_secs,
        };
        if self.emitted_phase != Some(event.phase) {
            self.emitted_phase = Some(event.phase);
            self.state.phase_elapsed_secs = 0.0;
        }
        self.state.phase_elapsed_secs += dt;
        self.state.events_emitted += 1;

        tracing::trace!(
            phase = %event.phase,
            kind = event.kind.name(),
            duration = dt,
            audible = self.state.audible_secs,
            "event scheduled"
        );
    }

    fn event(
        &mut self,
        phase: Phase,
        kind: EventKind,
        duration_secs: f32,
        speeds: (f32, f32),
    ) -> SoundEvent {
        self.event_with_intensity(phase, kind, duration_secs, speeds, (0.6, 1.0))
    }

    fn event_with_intensity(
        &mut self,
        phase: Phase,
        kind: EventKind,
        duration_secs: f32,
        speeds: (f32, f32),
        intensity: (f32, f32),
    ) -> SoundEvent {
        let intensity = uniform(&mut self.rng, intensity.0, intensity.1);
        let seed = self.rng.random();
        SoundEvent::new(phase, kind, duration_secs, intensity, speeds, seed)
    }

    fn chance(&mut self, probability: f32) -> bool {
        let draw: f32 = self.rng.random();
        roll(draw, probability)
    }

    fn draw_secs(&mut self, lo: f32, hi: f32) -> f32 {
        uniform(&mut self.rng, lo, hi)
    }
}

impl Iterator for Sequencer {
    type Item = SoundEvent;

    fn next(&mut self) -> Option<SoundEvent> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departure_opens_with_doors_then_acceleration() {
        let mut seq = Sequencer::new(JourneyParams::default(), 3);
        let first = seq.next_event().unwrap();
        let second = seq.next_event().unwrap();
        assert_eq!(first.kind, EventKind::DoorSequence);
        assert!(matches!(second.kind, EventKind::Acceleration { .. }));
        assert_eq!(second.start_speed_kmh, 0.0);
        assert!(second.end_speed_kmh >= 60.0 && second.end_speed_kmh <= 80.0);
        assert_eq!(seq.state().phase, Phase::Cruising);
    }

    #[test]
    fn zero_budget_emits_nothing() {
        let mut seq = Sequencer::new(JourneyParams::default(), 3).with_budget_secs(0.0);
        assert!(seq.next_event().is_none());
    }

    #[test]
    fn budget_is_checked_between_departure_events() {
        // The door sequence alone crosses a 1 s budget; acceleration never starts.
        let events: Vec<_> = Sequencer::new(JourneyParams::default(), 3)
            .with_budget_secs(1.0)
            .collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::DoorSequence);
    }

    #[test]
    fn spliced_budget_is_still_met_after_cross_fades() {
        const SR: f32 = 44100.0;
        const OVERLAP: usize = 3528;
        for seed in 0..3000 {
            let events: Vec<_> = Sequencer::new(JourneyParams::default(), seed)
                .with_budget_secs(30.0)
                .with_splice_overlap(SR, OVERLAP)
                .collect();
            let samples: usize = events.iter().map(|e| e.sample_len(SR)).sum();
            let audible = samples - (events.len() - 1) * OVERLAP;
            assert!(audible >= 30 * 44100, "seed {seed}: {audible} samples");
        }
    }

    #[test]
    fn without_a_splice_audible_time_is_emitted_time() {
        let mut seq = Sequencer::new(JourneyParams::default(), 8).with_budget_secs(120.0);
        while seq.next_event().is_some() {}
        assert_eq!(seq.state().audible_secs, seq.state().emitted_secs);
        assert!(seq.state().emitted_secs >= 120.0);
    }

    #[test]
    fn first_event_is_counted_whole() {
        let mut seq =
            Sequencer::new(JourneyParams::default(), 8).with_splice_overlap(44100.0, 3528);
        let doors = seq.next_event().unwrap();
        let whole = doors.sample_len(44100.0) as f64 / 44100.0;
        assert!((seq.state().audible_secs - whole).abs() < 1e-9);
        let accel = seq.next_event().unwrap();
        let expected = whole + (accel.sample_len(44100.0) - 3528) as f64 / 44100.0;
        assert!((seq.state().audible_secs - expected).abs() < 1e-9);
    }

    #[test]
    fn decelerates_from_running_speed() {
        let seq = Sequencer::new(JourneyParams::default(), 11);
        let mut prev: Option<SoundEvent> = None;
        for event in seq.take(200) {
            if let (EventKind::Deceleration { .. }, Some(p)) = (event.kind, prev) {
                assert_eq!(event.start_speed_kmh, p.end_speed_kmh);
                assert_eq!(event.end_speed_kmh, 0.0);
            }
            prev = Some(event);
        }
    }

    #[test]
    fn stations_are_counted() {
        let mut seq = Sequencer::new(JourneyParams::default(), 5);
        for _ in 0..200 {
            seq.next_event();
        }
        assert!(seq.state().stations > 0);
        assert!(seq.state().distance_m > 0.0);
    }
}
