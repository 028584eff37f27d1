//! Top-level markaudit configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{OracleConfig, ParserConfig, ReportConfig, ScanConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`MARKAUDIT_*`)
/// 3. Project config (`markaudit.toml` in the scan root, or `--config`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    pub scan: ScanConfig,
    pub parser: ParserConfig,
    pub oracle: OracleConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub test_dirs: Option<Vec<String>>,
    pub threads: Option<usize>,
    pub oracle_enabled: Option<bool>,
    pub oracle_timeout_secs: Option<u64>,
}

impl AuditConfig {
    /// Load configuration for a scan rooted at `root`.
    ///
    /// When `explicit_path` is given it must exist; otherwise
    /// `markaudit.toml` in `root` is used if present.
    pub fn load(
        root: &Path,
        explicit_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path = Self::project_config_path(root);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Returns `<root>/markaudit.toml`.
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_CONFIG_FILE)
    }

    /// Validate the configuration values.
    pub fn validate(config: &AuditConfig) -> Result<(), ConfigError> {
        if let Some(ref command) = config.oracle.command {
            if command.is_empty() || command[0].trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "oracle.command".to_string(),
                    message: "must name a program".to_string(),
                });
            }
        }
        if config.oracle.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "oracle.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref exts) = config.scan.extensions {
            if exts.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.extensions".to_string(),
                    message: "must list at least one extension".to_string(),
                });
            }
        }
        for (field, value) in [
            ("scan.file_prefix", config.scan.file_prefix.as_deref()),
            ("parser.function_prefix", config.parser.function_prefix.as_deref()),
            ("parser.class_prefix", config.parser.class_prefix.as_deref()),
            ("parser.mark_namespace", config.parser.mark_namespace.as_deref()),
        ] {
            if value.is_some_and(|v| v.is_empty()) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut AuditConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: AuditConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), "loaded project config");
        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` (or non-empty) value.
    fn merge(base: &mut AuditConfig, other: &AuditConfig) {
        // Scan
        if other.scan.test_dirs.is_some() {
            base.scan.test_dirs = other.scan.test_dirs.clone();
        }
        if other.scan.file_prefix.is_some() {
            base.scan.file_prefix = other.scan.file_prefix.clone();
        }
        if other.scan.extensions.is_some() {
            base.scan.extensions = other.scan.extensions.clone();
        }
        if other.scan.respect_gitignore.is_some() {
            base.scan.respect_gitignore = other.scan.respect_gitignore;
        }
        if !other.scan.exclude.is_empty() {
            base.scan.exclude = other.scan.exclude.clone();
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }

        // Parser
        if other.parser.function_prefix.is_some() {
            base.parser.function_prefix = other.parser.function_prefix.clone();
        }
        if other.parser.class_prefix.is_some() {
            base.parser.class_prefix = other.parser.class_prefix.clone();
        }
        if other.parser.class_marker.is_some() {
            base.parser.class_marker = other.parser.class_marker.clone();
        }
        if other.parser.mark_namespace.is_some() {
            base.parser.mark_namespace = other.parser.mark_namespace.clone();
        }

        // Oracle
        if other.oracle.enabled.is_some() {
            base.oracle.enabled = other.oracle.enabled;
        }
        if other.oracle.command.is_some() {
            base.oracle.command = other.oracle.command.clone();
        }
        if !other.oracle.extra_args.is_empty() {
            base.oracle.extra_args = other.oracle.extra_args.clone();
        }
        if other.oracle.timeout_secs.is_some() {
            base.oracle.timeout_secs = other.oracle.timeout_secs;
        }

        // Report
        if other.report.good_threshold.is_some() {
            base.report.good_threshold = other.report.good_threshold;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `MARKAUDIT_SCAN_THREADS`, `MARKAUDIT_ORACLE_ENABLED`, etc.
    fn apply_env_overrides(config: &mut AuditConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("MARKAUDIT_SCAN_THREADS") {
            config.scan.threads = Some(parse_env("MARKAUDIT_SCAN_THREADS", &val)?);
        }
        if let Ok(val) = std::env::var("MARKAUDIT_ORACLE_ENABLED") {
            config.oracle.enabled = Some(parse_env("MARKAUDIT_ORACLE_ENABLED", &val)?);
        }
        if let Ok(val) = std::env::var("MARKAUDIT_ORACLE_TIMEOUT_SECS") {
            config.oracle.timeout_secs = Some(parse_env("MARKAUDIT_ORACLE_TIMEOUT_SECS", &val)?);
        }
        if let Ok(val) = std::env::var("MARKAUDIT_MARK_NAMESPACE") {
            config.parser.mark_namespace = Some(val);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut AuditConfig, cli: &CliOverrides) {
        if let Some(ref dirs) = cli.test_dirs {
            config.scan.test_dirs = Some(dirs.clone());
        }
        if let Some(v) = cli.threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.oracle_enabled {
            config.oracle.enabled = Some(v);
        }
        if let Some(v) = cli.oracle_timeout_secs {
            config.oracle.timeout_secs = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        field: name.to_string(),
        message: format!("{value:?}: {e}"),
    })
}
