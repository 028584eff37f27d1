//! Collection oracle configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ORACLE_COMMAND, DEFAULT_ORACLE_TIMEOUT_SECS};

/// Configuration for the external collection oracle.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// Query the oracle at all. Default: true.
    pub enabled: Option<bool>,
    /// Program and leading arguments. Default: `["python", "-m", "pytest"]`.
    pub command: Option<Vec<String>>,
    /// Extra arguments appended after the collection flags.
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Per-query timeout in seconds. Default: 120.
    pub timeout_secs: Option<u64>,
}

impl OracleConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_command(&self) -> Vec<String> {
        match &self.command {
            Some(cmd) => cmd.clone(),
            None => DEFAULT_ORACLE_COMMAND.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_ORACLE_TIMEOUT_SECS)
    }
}
