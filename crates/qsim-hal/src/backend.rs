//! Backend trait and configuration.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()
//!    (sync, &ref)       (sync)        (async)
//! ```
//!
//! `validate` performs every check that can fail before a state buffer is
//! allocated. `run` returns `Err` only for those request-level failures;
//! anything that goes wrong while gates are applied is reported as an
//! [`ExecutionResult`] with `successful = false`.

use async_trait::async_trait;
use qsim_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::options::ExecutionOptions;
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Deserialize the extra settings into a typed configuration.
    pub fn extra_as<T: serde::de::DeserializeOwned>(&self) -> HalResult<T> {
        serde_json::from_value(serde_json::Value::Object(self.extra.clone()))
            .map_err(|e| HalError::Configuration(format!("{}: {e}", self.name)))
    }
}

/// Trait for circuit execution backends.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit and options against backend limits.
    fn validate(&self, circuit: &Circuit, options: &ExecutionOptions) -> HalResult<()>;

    /// Execute a circuit and sample it.
    async fn run(
        &self,
        circuit: &Circuit,
        options: &ExecutionOptions,
    ) -> HalResult<ExecutionResult>;
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Limits {
        max_qubits: u32,
    }

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("test").with_extra("max_qubits", serde_json::json!(12));

        assert_eq!(config.name, "test");
        assert_eq!(
            config.extra_as::<Limits>().unwrap(),
            Limits { max_qubits: 12 }
        );
    }

    #[test]
    fn test_backend_config_bad_extra() {
        let config = BackendConfig::new("test").with_extra("max_qubits", serde_json::json!("many"));
        assert!(matches!(
            config.extra_as::<Limits>(),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_backend_config_flattened() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "simulator", "seed": 3}"#).unwrap();
        assert_eq!(config.extra.get("seed"), Some(&serde_json::json!(3)));
    }

    #[test]
    fn test_backend_config_debug_shows_settings() {
        let config = BackendConfig::new("simulator").with_extra("seed", serde_json::json!(7));
        let debug = format!("{config:?}");
        assert!(debug.contains("\"simulator\""), "{debug}");
        assert!(debug.contains("seed"), "{debug}");
    }
}
