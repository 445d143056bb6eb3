//! `calc.toml` loading.
//!
//! ```toml
//! [logging]
//! default = "info"
//!
//! [logging.modules]
//! calc_ci = "debug"
//!
//! [pipeline]
//! branch = "main"
//! toolchain = "1.75.0"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use calc_ci::PipelineSettings;
use calc_core::errors::{CalcError, ErrorInfo};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "calc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to every target without an override.
    pub default: String,
    /// Per-target level overrides, e.g. `calc_ci = "debug"`.
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: "warn".into(),
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive string understood by `EnvFilter`.
    pub fn directives(&self) -> String {
        let mut filter = self.default.clone();
        for (module, level) in &self.modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    pub logging: LoggingConfig,
    pub pipeline: PipelineSettings,
}

impl CalcConfig {
    /// Loads `explicit` when given, else `calc.toml` from `cwd` if it exists,
    /// else defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, CalcError> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let contents = fs::read_to_string(&path).map_err(|err| {
            CalcError::Config(
                ErrorInfo::new("calc_cli.config_read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let config = Self::parse(&contents).map_err(|err| match err {
            CalcError::Config(info) => {
                CalcError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, CalcError> {
        toml::from_str(contents).map_err(|err| {
            CalcError::Config(
                ErrorInfo::new("calc_cli.config_parse", err.to_string())
                    .with_hint("see calc.toml keys [logging] and [pipeline]"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalcConfig::load(None, dir.path()).unwrap();
        assert_eq!(config, CalcConfig::default());
        assert_eq!(config.logging.directives(), "warn");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[logging]\ndefault = \"info\"\n[logging.modules]\ncalc_ci = \"debug\"\n\n[pipeline]\nbranch = \"develop\"\n",
        )
        .unwrap();
        let config = CalcConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.logging.directives(), "info,calc_ci=debug");
        assert_eq!(config.pipeline.branch, "develop");
        assert_eq!(config.pipeline.toolchain, calc_ci::DEFAULT_TOOLCHAIN);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = CalcConfig::load(Some(&missing), dir.path()).unwrap_err();
        assert_eq!(err.info().code, "calc_cli.config_read");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[pipeline\nbranch = 1").unwrap();
        let err = CalcConfig::load(Some(&path), dir.path()).unwrap_err();
        assert_eq!(err.info().code, "calc_cli.config_parse");
        assert!(err.info().context.contains_key("path"));
    }
}
