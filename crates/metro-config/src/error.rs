//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("could not read config '{path}': {source}")]
    ReadFile {
        /// File that was asked for.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `save` could not write the file.
    #[error("could not write config '{path}': {source}")]
    WriteFile {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `save` could not create the parent directory.
    #[error("could not create config directory '{path}': {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, an unknown key, or a value of the wrong type.
    #[error("config is not valid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("could not render config as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A field holds a value the simulator cannot use
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending field, e.g. `journey.cruise_window_secs`.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::Invalid`] naming the dotted `field`.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn not_found() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
    }

    #[test]
    fn read_error_names_the_path() {
        let err = ConfigError::read_file("/a/config.toml", not_found());
        let msg = err.to_string();
        assert!(msg.contains("could not read config"), "got: {msg}");
        assert!(msg.contains("/a/config.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_display_names_the_field() {
        let err = ConfigError::invalid("output.crossfade_ms", "must be between 50 and 150");
        assert_eq!(
            err.to_string(),
            "invalid value for 'output.crossfade_ms': must be between 50 and 150"
        );
        assert!(err.source().is_none());
    }
}
