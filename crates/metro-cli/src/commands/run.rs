//! Real-time journey playback command.

use super::common::{load_config, parse_minutes, prompt_minutes, resolve_seed};
use clap::Args;
use metro_config::{ChannelLayout, SimulatorConfig};
use metro_core::SAMPLE_RATE;
use metro_io::{CpalSink, PlaybackAdapter, PlaybackReport, PlaybackSink, StopReason, StopSignal};
use metro_synth::Journey;
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// Run length in minutes (prompted for when absent)
    #[arg(short, long, value_parser = parse_minutes)]
    minutes: Option<f32>,

    /// Seed for a reproducible ride
    #[arg(short, long)]
    seed: Option<u64>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output device name (substring match)
    #[arg(short, long)]
    device: Option<String>,

    /// Play a single channel
    #[arg(long)]
    mono: bool,
}

/// Merge flags over the file; flags win.
fn apply_overrides(config: &mut SimulatorConfig, args: &RunArgs) {
    if args.device.is_some() {
        config.output.device.clone_from(&args.device);
    }
    if args.mono {
        config.output.channels = ChannelLayout::Mono;
    }
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let minutes = match args.minutes.or(config.journey.minutes) {
        Some(m) => m,
        None => prompt_minutes(std::io::stdin().lock(), std::io::stdout()),
    };
    let seed = resolve_seed(args.seed, &config);

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nStopping after the current segment...");
        handler_stop.request_stop();
    })?;

    let mut sink = CpalSink::new(config.output.device.clone());
    let mixer = config.mixer_config();
    let journey = Journey::new(config.journey_params(), seed, SAMPLE_RATE as f32)
        .with_budget_secs(f64::from(minutes) * 60.0)
        .with_splice_overlap(mixer.crossfade_len());
    let adapter = PlaybackAdapter::new(mixer).with_queue_secs(config.output.queue_secs);

    let format = config.output_format();
    println!("Riding the line for {minutes} minute(s), seed {seed}");
    println!(
        "  Output: {} ({} Hz, {}-bit, {} ch)",
        sink.name(),
        format.sample_rate,
        format.bits_per_sample(),
        format.channel_count()
    );
    println!("Press Ctrl+C to stop...\n");

    let report = adapter.run(&mut sink, journey, &stop)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &PlaybackReport) {
    let how = match report.reason {
        StopReason::SourceExhausted => "journey complete",
        StopReason::Interrupted => "stopped",
    };
    println!(
        "\n{how}: {} segment(s), {:.1} s of audio in {:.1} s",
        report.segments,
        report.duration_secs(),
        report.elapsed.as_secs_f64()
    );
    if report.underruns > 0 || report.device_underruns > 0 {
        println!(
            "  underruns: {} queue, {} device",
            report.underruns, report.device_underruns
        );
    }
}
