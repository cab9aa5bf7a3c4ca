//! CLI configuration.
//!
//! Settings come from a YAML file with two optional sections:
//!
//! ```yaml
//! simulator:
//!   max_qubits: 24
//!   norm_policy: strict
//!   bit_order: msb_first
//!   parallel_sampling: true
//! annealer:
//!   parallel: true
//!   schedule:
//!     initialTemperature: 2.0
//!     coolingRate: 0.9
//! ```
//!
//! Missing keys fall back to their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use qsim_adapter_sim::{MAX_SUPPORTED_QUBITS, SimulatorConfig};
use qsim_anneal::AnnealerConfig;

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// State-vector simulator settings.
    pub simulator: SimulatorConfig,
    /// QUBO annealer settings.
    pub annealer: AnnealerConfig,
}

impl CliConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: CliConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. The explicit file, if one is given (it must exist)
    /// 2. `~/.qsim/config.yaml`, if it exists
    /// 3. Built-in defaults
    ///
    /// `QSIM_MAX_QUBITS` and `QSIM_SEED` override whatever was loaded.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "loading default config");
                    Self::from_file(path)?
                }
                _ => Self::default(),
            },
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulator;
        if sim.max_qubits == 0 || sim.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "simulator.max_qubits must be in 1..={MAX_SUPPORTED_QUBITS}, got {}",
                sim.max_qubits
            )));
        }
        if sim.max_shots == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.max_shots must be positive".to_string(),
            ));
        }
        self.annealer
            .schedule
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("annealer.schedule: {e}")))
    }

    /// Apply environment variable overrides. Unset variables leave the
    /// loaded values unchanged.
    fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var("QSIM_MAX_QUBITS") {
            self.simulator.max_qubits = v.parse().map_err(|_| {
                ConfigError::ValidationError(format!("QSIM_MAX_QUBITS is not a number: {v}"))
            })?;
        }
        if let Ok(v) = std::env::var("QSIM_SEED") {
            let seed: u64 = v.parse().map_err(|_| {
                ConfigError::ValidationError(format!("QSIM_SEED is not a number: {v}"))
            })?;
            self.simulator.seed = Some(seed);
            self.annealer.seed = Some(seed);
        }
        Ok(self)
    }
}

/// `~/.qsim/config.yaml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qsim").join("config.yaml"))
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_adapter_sim::{BitOrder, NormPolicy};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.simulator.max_qubits, 20);
        assert_eq!(config.simulator.norm_policy, NormPolicy::Relaxed);
        assert!(!config.annealer.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let file = write_config(
            "simulator:\n  max_qubits: 12\n  norm_policy: strict\n  bit_order: qubit_zero_first\n",
        );
        let config = CliConfig::from_file(file.path()).unwrap();

        assert_eq!(config.simulator.max_qubits, 12);
        assert_eq!(config.simulator.norm_policy, NormPolicy::Strict);
        assert_eq!(config.simulator.bit_order, BitOrder::QubitZeroFirst);
        assert_eq!(config.simulator.max_shots, 1_000_000);
        assert_eq!(config.annealer, AnnealerConfig::default());
    }

    #[test]
    fn test_annealer_section() {
        let file = write_config(
            "annealer:\n  parallel: true\n  seed: 7\n  schedule:\n    coolingRate: 0.9\n",
        );
        let config = CliConfig::from_file(file.path()).unwrap();

        assert!(config.annealer.parallel);
        assert_eq!(config.annealer.seed, Some(7));
        assert!((config.annealer.schedule.cooling_rate - 0.9).abs() < f64::EPSILON);
        assert!((config.annealer.schedule.initial_temperature - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("simulator:\n  max_qubits: 64\n");
        assert!(matches!(
            CliConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        let file = write_config("annealer:\n  schedule:\n    coolingRate: 1.5\n");
        assert!(matches!(
            CliConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        let file = write_config("simulator: [not, a, map]\n");
        assert!(matches!(
            CliConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(matches!(
            CliConfig::load(Some("/nonexistent/qsim.yaml")),
            Err(ConfigError::IoError(_))
        ));
    }
}
