//! Shared CLI helpers used across multiple commands.

use metro_config::{SimulatorConfig, default_config_path};
use std::io::{BufRead, Write};
use std::path::Path;

/// Run length used when nothing else says otherwise.
pub const DEFAULT_MINUTES: f32 = 2.0;

/// Parse a strictly positive number of minutes for clap's `value_parser`.
pub fn parse_minutes(s: &str) -> Result<f32, String> {
    match s.trim().parse::<f32>() {
        Ok(m) if m.is_finite() && m > 0.0 => Ok(m),
        _ => Err(format!("'{s}' is not a positive number of minutes")),
    }
}

/// Load the config named on the command line, or the user config if present.
///
/// An explicit path must exist; the default location may be missing.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SimulatorConfig> {
    let config = match path {
        Some(path) => SimulatorConfig::load(path)?,
        None => {
            let path = default_config_path();
            tracing::debug!(path = %path.display(), "looking for user config");
            SimulatorConfig::load_or_default(&path)?
        }
    };
    Ok(config)
}

/// Pick the seed: flag, then config, then a fresh random one.
pub fn resolve_seed(flag: Option<u64>, config: &SimulatorConfig) -> u64 {
    flag.or(config.journey.seed).unwrap_or_else(rand::random)
}

/// Ask how long to run.
///
/// Blank, unparsable or non-positive answers (and a closed input) give
/// [`DEFAULT_MINUTES`].
pub fn prompt_minutes<R: BufRead, W: Write>(mut input: R, mut output: W) -> f32 {
    // A broken prompt still leaves us a sensible default.
    let _ = write!(
        output,
        "How many minutes should the simulation run? (default: 2) "
    );
    let _ = output.flush();

    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return DEFAULT_MINUTES;
    }
    match line.trim().parse::<f32>() {
        Ok(m) if m.is_finite() && m > 0.0 => m,
        _ => DEFAULT_MINUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> (f32, String) {
        let mut out = Vec::new();
        let minutes = prompt_minutes(text.as_bytes(), &mut out);
        (minutes, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prompt_accepts_a_number() {
        let (minutes, shown) = answer("3.5\n");
        assert_eq!(minutes, 3.5);
        assert!(shown.contains("How many minutes should the simulation run? (default: 2)"));
    }

    #[test]
    fn prompt_falls_back_to_two() {
        for text in ["\n", "", "soon\n", "0\n", "-4\n", "NaN\n"] {
            assert_eq!(answer(text).0, DEFAULT_MINUTES, "input {text:?}");
        }
    }

    #[test]
    fn minutes_flag_must_be_positive() {
        assert_eq!(parse_minutes("1.5"), Ok(1.5));
        assert!(parse_minutes("0").is_err());
        assert!(parse_minutes("abc").is_err());
    }

    #[test]
    fn seed_prefers_the_flag() {
        let mut config = SimulatorConfig::default();
        config.journey.seed = Some(5);
        assert_eq!(resolve_seed(Some(9), &config), 9);
        assert_eq!(resolve_seed(None, &config), 5);
    }
}
