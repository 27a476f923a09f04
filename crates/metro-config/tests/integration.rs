//! Integration tests for metro-config.
//!
//! File round trips and the hand-off from config to the journey and mixer.

use metro_config::{ChannelLayout, ConfigError, SimulatorConfig};
use metro_io::{Channels, Mixer};
use metro_synth::Sequencer;
use tempfile::TempDir;

/// Saved configs load back unchanged.
#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    let mut config = SimulatorConfig::default();
    config.journey.seed = Some(1234);
    config.journey.minutes = Some(3.5);
    config.journey.odds.brake_squeal = 0.6;
    config.conditions.vehicle_age = 0.9;
    config.output.channels = ChannelLayout::Mono;
    config.output.device = Some("USB".to_string());

    config.save(&path).expect("should create the parent directory and save");
    let loaded = SimulatorConfig::load(&path).unwrap();

    assert_eq!(loaded.journey.seed, Some(1234));
    assert_eq!(loaded.journey.minutes, Some(3.5));
    assert_eq!(loaded.output.channels, ChannelLayout::Mono);
    assert_eq!(loaded.output.device.as_deref(), Some("USB"));
    assert!((loaded.journey.odds.brake_squeal - 0.6).abs() < 1e-6);
    assert!((loaded.conditions.vehicle_age - 0.9).abs() < 1e-6);
}

#[test]
fn test_missing_file_is_a_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let err = SimulatorConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = SimulatorConfig::load_or_default(temp_dir.path().join("none.toml")).unwrap();
    assert_eq!(config, SimulatorConfig::default());
}

#[test]
fn test_invalid_file_names_the_field() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "[journey.odds]\nwheel_slip = 1.5\n").unwrap();

    let err = SimulatorConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("journey.odds.wheel_slip"), "{err}");
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let err = SimulatorConfig::from_toml("[output\nchannels = ").unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn test_bad_channel_name_is_rejected() {
    let err = SimulatorConfig::from_toml("[output]\nchannels = \"quad\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

/// A loaded config drives the same journey as the equivalent params.
#[test]
fn test_config_drives_journey_and_mixer() {
    let config = SimulatorConfig::from_toml(
        r#"
        [journey]
        seed = 9
        cruise_window_secs = [20.0, 40.0]

        [output]
        channels = "mono"
        crossfade_ms = 100.0
        chunk_frames = 512
        "#,
    )
    .unwrap();

    let seed = config.journey.seed.unwrap();
    let a: Vec<_> = Sequencer::new(config.journey_params(), seed)
        .with_budget_secs(300.0)
        .collect();
    let b: Vec<_> = Sequencer::new(config.journey_params(), seed)
        .with_budget_secs(300.0)
        .collect();
    assert_eq!(a, b);
    assert!(!a.is_empty());

    let mixer = Mixer::new(config.mixer_config());
    assert_eq!(mixer.config().format.channels, Channels::Mono);
    assert_eq!(mixer.config().chunk_frames, 512);
    assert_eq!(mixer.crossfade_len(), 4410);
}
