//! Operator configuration (spec.md §6): where the graph endpoint lives.
//! Persisted with `confy` under the platform's standard config directory,
//! the same crate the teacher already depended on for this purpose.

use serde::{Deserialize, Serialize};

use crate::error::ExecutorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEndpointConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-kind recency cache capacity (spec.md §4.2 default: 50).
    pub cache_capacity: usize,
}

impl Default for GraphEndpointConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7687,
            username: None,
            password: None,
            cache_capacity: 50,
        }
    }
}

impl GraphEndpointConfig {
    /// Load the persisted config, falling back to [`Default`] if none exists
    /// yet. A corrupt config file is a permanent misconfiguration, not a
    /// retryable executor failure.
    pub fn load() -> Result<Self, ExecutorError> {
        confy::load("pcapgraph", "config")
            .map_err(|err| ExecutorError::Permanent(format!("loading configuration: {err}")))
    }

    pub fn store(&self) -> Result<(), ExecutorError> {
        confy::store("pcapgraph", "config", self)
            .map_err(|err| ExecutorError::Permanent(format!("storing configuration: {err}")))
    }
}
