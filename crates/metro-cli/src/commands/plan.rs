//! Print a journey schedule without touching audio.

use super::common::{DEFAULT_MINUTES, load_config, parse_minutes, resolve_seed};
use clap::Args;
use metro_core::SAMPLE_RATE;
use metro_synth::Sequencer;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct PlanArgs {
    /// Schedule length in minutes
    #[arg(short, long, value_parser = parse_minutes)]
    minutes: Option<f32>,

    /// Seed to plan for
    #[arg(short, long)]
    seed: Option<u64>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let minutes = args
        .minutes
        .or(config.journey.minutes)
        .unwrap_or(DEFAULT_MINUTES);
    let seed = resolve_seed(args.seed, &config);

    let sequencer = Sequencer::new(config.journey_params(), seed)
        .with_budget_secs(f64::from(minutes) * 60.0)
        .with_splice_overlap(SAMPLE_RATE as f32, config.mixer_config().crossfade_len());
    let stdout = std::io::stdout();
    write_plan(&mut stdout.lock(), sequencer, seed, minutes)?;
    Ok(())
}

fn write_plan<W: Write>(
    out: &mut W,
    mut sequencer: Sequencer,
    seed: u64,
    minutes: f32,
) -> std::io::Result<()> {
    writeln!(out, "Journey plan: seed {seed}, {minutes} minute(s)")?;
    writeln!(out)?;

    let mut at = 0.0f64;
    let mut idx = 0usize;
    while let Some(event) = sequencer.next_event() {
        idx += 1;
        writeln!(out, "{idx:>4} {at:>8.2}s  {event}")?;
        at += f64::from(event.duration_secs);
    }

    let state = sequencer.state();
    writeln!(out)?;
    writeln!(
        out,
        "{} event(s), {:.1} s after cross-fades, {} station stop(s), {:.0} m travelled",
        state.events_emitted, state.audible_secs, state.stations, state.distance_m
    )
}
