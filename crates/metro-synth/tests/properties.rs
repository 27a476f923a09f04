//! Property-based tests for the journey sequencer and the builders.
//!
//! Whatever the seed, odds or budget, the schedule must walk legal phase
//! transitions, keep every event inside its duration range and stop on the
//! first event that crosses the budget.

use metro_synth::{EventOdds, EventRenderer, JourneyParams, Phase, Sequencer, SynthContext};
use proptest::prelude::*;

const SR: f32 = 44100.0;

fn params(curve: f32, arrival: f32, window_lo: f32) -> JourneyParams {
    JourneyParams {
        cruise_window_secs: (window_lo, window_lo + 20.0),
        odds: EventOdds {
            curve,
            arrival,
            ..EventOdds::default()
        },
        ..JourneyParams::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Phase path is legal and starts at the platform.
    #[test]
    fn schedule_walks_legal_transitions(
        seed in any::<u64>(),
        curve in 0.0f32..0.6,
        arrival in 0.0f32..0.4,
        window_lo in 10.0f32..60.0,
    ) {
        let events: Vec<_> = Sequencer::new(params(curve, arrival, window_lo), seed)
            .with_budget_secs(900.0)
            .collect();

        prop_assert_eq!(events[0].phase, Phase::Departure);
        for pair in events.windows(2) {
            let (a, b) = (pair[0].phase, pair[1].phase);
            prop_assert!(a == b || a.can_transition_to(b), "{} -> {}", a, b);
        }
        for event in &events {
            prop_assert!(event.kind.duration_range().contains(event.duration_secs));
            prop_assert!((0.0..=1.0).contains(&event.intensity));
        }
    }

    /// The schedule covers the budget and stops on the event that crosses it.
    #[test]
    fn budget_is_crossed_exactly_once(seed in any::<u64>(), budget in 1.0f64..600.0) {
        let events: Vec<_> = Sequencer::new(JourneyParams::default(), seed)
            .with_budget_secs(budget)
            .collect();

        let total: f64 = events.iter().map(|e| f64::from(e.duration_secs)).sum();
        let before_last = total - f64::from(events[events.len() - 1].duration_secs);
        prop_assert!(total >= budget - 1e-3);
        prop_assert!(before_last < budget);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    /// Rendered events match their declared length and stay in [-1, 1].
    #[test]
    fn rendered_events_are_bounded(seed in any::<u64>()) {
        let renderer = EventRenderer::new(SynthContext::default());
        for event in Sequencer::new(JourneyParams::default(), seed).take(8) {
            let rendered = renderer.render(&event);
            let samples = rendered.buffer.samples();
            prop_assert_eq!(samples.len(), event.sample_len(SR));
            prop_assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        }
    }
}
