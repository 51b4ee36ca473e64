//! Replay configuration.
//!
//! Every field has a default, so an empty (or absent) TOML file is a valid
//! configuration. Command-line flags are applied on top of the loaded values
//! and the result is validated before any input file is read.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{InputError, ReplayResult, ValidationError};
use crate::plan::WitnessSelector;
use crate::render::GridSymbols;

/// Default pause between frames, in seconds.
pub const DEFAULT_DELAY_SECS: f64 = 0.5;

/// Longest accepted pause between frames, in seconds.
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Presentation and input-selection settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Pause between frames in seconds. Frame 0 waits twice as long.
    pub delay_secs: f64,
    /// Clear the terminal before each frame.
    pub clear_screen: bool,
    /// Which clingo model to replay.
    pub witness: WitnessSelector,
    /// Grid glyphs.
    pub symbols: GridSymbols,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_DELAY_SECS,
            clear_screen: true,
            witness: WitnessSelector::First,
            symbols: GridSymbols::default(),
        }
    }
}

impl ReplayConfig {
    /// Loads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| InputError::from_io(path, e))?;
        let config = Self::from_toml_str(&text).map_err(|e| InputError::MalformedConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "loaded replay config");
        Ok(config)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Sets the frame delay (builder pattern).
    #[must_use]
    pub fn with_delay_secs(mut self, delay_secs: f64) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    /// Sets the witness selector (builder pattern).
    #[must_use]
    pub fn with_witness(mut self, witness: WitnessSelector) -> Self {
        self.witness = witness;
        self
    }

    /// Disables screen clearing (builder pattern).
    #[must_use]
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=MAX_DELAY_SECS).contains(&self.delay_secs) {
            return Err(ValidationError::InvalidDelay {
                value: self.delay_secs,
            });
        }
        self.symbols.validate()
    }

    /// Frame delay as a duration. Call after [`validate`](Self::validate).
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs.min(MAX_DELAY_SECS)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReplayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delay(), Duration::from_millis(500));
        assert!(config.clear_screen);
        assert_eq!(config.witness, WitnessSelector::First);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ReplayConfig::from_toml_str(
            r#"
            witness = "last"

            [symbols]
            empty = "_"
            "#,
        )
        .unwrap();
        assert_eq!(config.witness, WitnessSelector::Last);
        assert_eq!(config.symbols.empty, "_");
        assert_eq!(config.symbols.highway, "#");
        assert!((config.delay_secs - DEFAULT_DELAY_SECS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_keys_and_bad_witness_are_rejected() {
        assert!(ReplayConfig::from_toml_str("speed = 3").is_err());
        assert!(ReplayConfig::from_toml_str("witness = \"best\"").is_err());
        assert_eq!(
            ReplayConfig::from_toml_str("witness = \"2\"").unwrap().witness,
            WitnessSelector::Index(2)
        );
    }

    #[test]
    fn test_validate_rejects_bad_delay() {
        for value in [-0.1, f64::NAN, f64::INFINITY] {
            let config = ReplayConfig::default().with_delay_secs(value);
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidDelay { .. })
            ));
        }
        assert!(ReplayConfig::default().with_delay_secs(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_delay_above_cap() {
        for value in [MAX_DELAY_SECS + 0.5, 1e19, f64::MAX] {
            let config = ReplayConfig::default().with_delay_secs(value);
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidDelay { .. })
            ));
        }
        let capped = ReplayConfig::default().with_delay_secs(MAX_DELAY_SECS);
        assert!(capped.validate().is_ok());
        assert_eq!(capped.delay(), Duration::from_secs(3600));
        assert_eq!(capped.delay().saturating_mul(2), Duration::from_secs(7200));
    }

    #[test]
    fn test_builders_override() {
        let config = ReplayConfig::default()
            .with_witness(WitnessSelector::Index(1))
            .without_clear();
        assert_eq!(config.witness, WitnessSelector::Index(1));
        assert!(!config.clear_screen);
    }

    #[test]
    fn test_malformed_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.toml");
        fs::write(&path, "delay_secs = \"slow\"").unwrap();
        let err = ReplayConfig::from_toml_file(&path).unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("replay.toml"));
    }
}
