//! Simulator configuration file format and conversions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use metro_io::{CROSSFADE_MS, Channels, DEFAULT_QUEUE_SECS, MixerConfig, OutputFormat};
use metro_synth::{Conditions, EventOdds, JourneyParams};

/// Top-level configuration.
///
/// Every field has a default, so an empty file (or no file at all) yields the
/// stock simulator.
///
/// # TOML Format
///
/// ```toml
/// [journey]
/// seed = 42
/// minutes = 5.0
/// cruise_window_secs = [25.0, 45.0]
/// cruise_speed_kmh = [60.0, 80.0]
/// curve_speed_factor = 0.8
///
/// [journey.odds]
/// flange_squeal = 0.3
/// wheel_slip = 0.2
/// brake_squeal = 0.25
///
/// [conditions]
/// track_wear = 0.7
/// temperature_c = 28.0
///
/// [output]
/// channels = "mono"
/// crossfade_ms = 100.0
/// device = "USB"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Scheduling parameters.
    pub journey: JourneyConfig,
    /// Line and rolling-stock conditions.
    pub conditions: ConditionsConfig,
    /// Mixer and device settings.
    pub output: OutputConfig,
}

/// `[journey]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct JourneyConfig {
    /// Fixed seed; a fresh one is drawn per run when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Run length; the CLI prompts when neither this nor `--minutes` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f32>,
    /// Cumulative cruising time per leg, `[min, max]` seconds.
    pub cruise_window_secs: (f32, f32),
    /// Line speed per leg, `[min, max]` km/h.
    pub cruise_speed_kmh: (f32, f32),
    /// Curve speed as a fraction of line speed.
    pub curve_speed_factor: f32,
    /// Probabilities.
    pub odds: OddsConfig,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        let params = JourneyParams::default();
        Self {
            seed: None,
            minutes: None,
            cruise_window_secs: params.cruise_window_secs,
            cruise_speed_kmh: params.cruise_speed_kmh,
            curve_speed_factor: params.curve_speed_factor,
            odds: OddsConfig::default(),
        }
    }
}

/// `[journey.odds]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OddsConfig {
    /// Chance a cruising decision becomes a curve.
    pub curve: f32,
    /// Chance a cruising decision heads for the station once allowed.
    pub arrival: f32,
    /// Chance a curve squeals.
    pub flange_squeal: f32,
    /// Chance a pull-away slips.
    pub wheel_slip: f32,
    /// Chance a stop squeals.
    pub brake_squeal: f32,
    /// Chance a cruising segment crosses points.
    pub switch_crossing: f32,
    /// Base chance of a rail defect, scaled up by track wear.
    pub rail_defect: f32,
}

impl Default for OddsConfig {
    fn default() -> Self {
        OddsConfig::from(EventOdds::default())
    }
}

impl From<EventOdds> for OddsConfig {
    fn from(o: EventOdds) -> Self {
        Self {
            curve: o.curve,
            arrival: o.arrival,
            flange_squeal: o.flange_squeal,
            wheel_slip: o.wheel_slip,
            brake_squeal: o.brake_squeal,
            switch_crossing: o.switch_crossing,
            rail_defect: o.rail_defect,
        }
    }
}

impl From<OddsConfig> for EventOdds {
    fn from(o: OddsConfig) -> Self {
        Self {
            curve: o.curve,
            arrival: o.arrival,
            flange_squeal: o.flange_squeal,
            wheel_slip: o.wheel_slip,
            brake_squeal: o.brake_squeal,
            switch_crossing: o.switch_crossing,
            rail_defect: o.rail_defect,
        }
    }
}

/// `[conditions]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConditionsConfig {
    /// Rail wear, 0 to 1.
    pub track_wear: f32,
    /// Rolling-stock age, 0 to 1.
    pub vehicle_age: f32,
    /// Passenger load, 0 to 1.
    pub passenger_load: f32,
    /// Tunnel temperature in °C.
    pub temperature_c: f32,
}

impl Default for ConditionsConfig {
    fn default() -> Self {
        let c = Conditions::default();
        Self {
            track_wear: c.track_wear,
            vehicle_age: c.vehicle_age,
            passenger_load: c.passenger_load,
            temperature_c: c.temperature_c,
        }
    }
}

impl From<ConditionsConfig> for Conditions {
    fn from(c: ConditionsConfig) -> Self {
        Self {
            track_wear: c.track_wear,
            vehicle_age: c.vehicle_age,
            passenger_load: c.passenger_load,
            temperature_c: c.temperature_c,
        }
    }
}

/// Channel layout as spelled in the file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// One channel.
    Mono,
    /// Two identical channels.
    #[default]
    Stereo,
}

impl From<ChannelLayout> for Channels {
    fn from(layout: ChannelLayout) -> Self {
        match layout {
            ChannelLayout::Mono => Channels::Mono,
            ChannelLayout::Stereo => Channels::Stereo,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Mono or stereo.
    pub channels: ChannelLayout,
    /// Frames per chunk handed to the device.
    pub chunk_frames: usize,
    /// Splice cross-fade in milliseconds (50 to 150).
    pub crossfade_ms: f32,
    /// Seconds of audio buffered between synthesis and playback (0.5 to 30).
    pub queue_secs: f32,
    /// Output device name (substring match); system default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let mixer = MixerConfig::default();
        Self {
            channels: ChannelLayout::default(),
            chunk_frames: mixer.chunk_frames,
            crossfade_ms: mixer.crossfade_ms,
            queue_secs: DEFAULT_QUEUE_SECS,
            device: None,
        }
    }
}

impl SimulatorConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load the file at `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SimulatorConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field; the first problem found is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let j = &self.journey;
        if let Some(minutes) = j.minutes
            && !(minutes.is_finite() && minutes > 0.0)
        {
            return Err(ConfigError::invalid("journey.minutes", "must be a positive number"));
        }

        let (w0, w1) = j.cruise_window_secs;
        if !(w0.is_finite() && w1.is_finite() && w0 > 0.0 && w1 <= 600.0) {
            return Err(ConfigError::invalid(
                "journey.cruise_window_secs",
                "bounds must lie in (0, 600] seconds",
            ));
        }
        if w1 < w0 + 10.0 {
            return Err(ConfigError::invalid(
                "journey.cruise_window_secs",
                "max must exceed min by at least one 10 s cruising segment",
            ));
        }

        let (s0, s1) = j.cruise_speed_kmh;
        if !(s0.is_finite() && s1.is_finite() && s0 >= 5.0 && s1 <= 120.0 && s0 <= s1) {
            return Err(ConfigError::invalid(
                "journey.cruise_speed_kmh",
                "expected min <= max within [5, 120] km/h",
            ));
        }
        if !(0.3..=1.0).contains(&j.curve_speed_factor) {
            return Err(ConfigError::invalid(
                "journey.curve_speed_factor",
                "must be between 0.3 and 1.0",
            ));
        }

        let odds = [
            ("curve", j.odds.curve),
            ("arrival", j.odds.arrival),
            ("flange_squeal", j.odds.flange_squeal),
            ("wheel_slip", j.odds.wheel_slip),
            ("brake_squeal", j.odds.brake_squeal),
            ("switch_crossing", j.odds.switch_crossing),
            ("rail_defect", j.odds.rail_defect),
        ];
        for (name, p) in odds {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(
                    format!("journey.odds.{name}"),
                    "probability must be between 0 and 1",
                ));
            }
        }
        if j.odds.curve + j.odds.arrival > 1.0 {
            return Err(ConfigError::invalid(
                "journey.odds.arrival",
                "curve + arrival must not exceed 1",
            ));
        }

        let c = &self.conditions;
        for (name, v) in [
            ("track_wear", c.track_wear),
            ("vehicle_age", c.vehicle_age),
            ("passenger_load", c.passenger_load),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::invalid(
                    format!("conditions.{name}"),
                    "must be between 0 and 1",
                ));
            }
        }
        if !(-30.0..=50.0).contains(&c.temperature_c) {
            return Err(ConfigError::invalid(
                "conditions.temperature_c",
                "must be between -30 and 50 °C",
            ));
        }

        let o = &self.output;
        if !CROSSFADE_MS.contains(o.crossfade_ms) {
            return Err(ConfigError::invalid(
                "output.crossfade_ms",
                format!("must be between {} and {}", CROSSFADE_MS.min, CROSSFADE_MS.max),
            ));
        }
        if !(64..=16_384).contains(&o.chunk_frames) {
            return Err(ConfigError::invalid(
                "output.chunk_frames",
                "must be between 64 and 16384",
            ));
        }
        if !(0.5..=30.0).contains(&o.queue_secs) {
            return Err(ConfigError::invalid(
                "output.queue_secs",
                "must be between 0.5 and 30 seconds",
            ));
        }
        Ok(())
    }

    /// Journey parameters for the sequencer.
    pub fn journey_params(&self) -> JourneyParams {
        JourneyParams {
            cruise_window_secs: self.journey.cruise_window_secs,
            cruise_speed_kmh: self.journey.cruise_speed_kmh,
            curve_speed_factor: self.journey.curve_speed_factor,
            odds: self.journey.odds.into(),
            conditions: self.conditions.into(),
        }
    }

    /// Output format for the sink.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat {
            channels: self.output.channels.into(),
            ..OutputFormat::default()
        }
    }

    /// Mixer settings.
    pub fn mixer_config(&self) -> MixerConfig {
        MixerConfig {
            crossfade_ms: self.output.crossfade_ms,
            chunk_frames: self.output.chunk_frames,
            format: self.output_format(),
        }
    }
}
