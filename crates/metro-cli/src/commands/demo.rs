//! Showcase playback: every sound event once.

use super::common::load_config;
use clap::Args;
use metro_core::Segments;
use metro_io::{CpalSink, PlaybackAdapter, StopSignal};
use metro_synth::{EventRenderer, SynthContext, showcase};
use std::path::PathBuf;

#[derive(Args)]
pub struct DemoArgs {
    /// Output device name (substring match)
    #[arg(short, long)]
    device: Option<String>,

    /// Seed for the showcase renders
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Configuration file (TOML) for conditions and output settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let device = args.device.or_else(|| config.output.device.clone());

    let events = showcase(args.seed);
    let ctx = SynthContext::new(
        metro_core::SAMPLE_RATE as f32,
        config.journey_params().conditions,
    );
    let renderer = EventRenderer::new(ctx);

    println!("Sound event showcase ({} events)", events.len());
    for (idx, event) in events.iter().enumerate() {
        println!("  [{}] {}", idx + 1, event);
    }
    println!();

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.request_stop())?;

    let segments = Segments::new(events.into_iter().map(move |event| {
        tracing::info!(kind = event.kind.name(), "showcase event");
        renderer.render(&event).buffer
    }));

    let mut sink = CpalSink::new(device);
    let report = PlaybackAdapter::new(config.mixer_config()).run(&mut sink, segments, &stop)?;

    println!("Done! {:.1} s of audio", report.duration_secs());
    Ok(())
}
