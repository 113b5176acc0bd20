use std::path::Path;

use anyhow::{anyhow, Result};
use common::utils::logging::LogFormat;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_filter() }
    }
}

fn default_filter() -> String { "info".to_string() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Reads `CONFIG_PATH` (default `config.toml`); a missing file yields the defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_path();
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path).map_err(|e| anyhow!("cannot load {path}: {e}"))
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_or_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // RUST_LOG_FORMAT overrides logging.format
        self.logging.apply_format_override(std::env::var("RUST_LOG_FORMAT").ok().as_deref())?;
        self.logging.normalize()
    }
}

impl LoggingConfig {
    pub fn apply_format_override(&mut self, raw: Option<&str>) -> Result<()> {
        if let Some(raw) = raw.filter(|r| !r.trim().is_empty()) {
            self.format = raw.parse::<LogFormat>().map_err(|e| anyhow!("RUST_LOG_FORMAT: {e}"))?;
        }
        Ok(())
    }

    fn normalize(&mut self) -> Result<()> {
        let trimmed = self.filter.trim();
        if trimmed.is_empty() {
            self.filter = default_filter();
        } else if trimmed.len() != self.filter.len() {
            self.filter = trimmed.to_string();
        }
        if self.filter.split(',').any(|d| d.trim().is_empty()) {
            return Err(anyhow!("logging.filter contains an empty directive: '{}'", self.filter));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() -> Result<()> {
        let cfg = load_from_str("")?;
        assert_eq!(cfg.logging.format, LogFormat::Compact);
        assert_eq!(cfg.logging.filter, "info");
        Ok(())
    }

    #[test]
    fn parses_logging_section() -> Result<()> {
        let cfg = load_from_str("[logging]\nformat = \"json\"\nfilter = \"debug,storage=trace\"\n")?;
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.filter, "debug,storage=trace");
        Ok(())
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(load_from_str("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn normalize_trims_and_fills_filter() -> Result<()> {
        let mut cfg = load_from_str("[logging]\nfilter = \"   \"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.logging.filter, "info");

        let mut cfg = load_from_str("[logging]\nfilter = \" warn \"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.logging.filter, "warn");
        Ok(())
    }

    #[test]
    fn normalize_rejects_empty_directive() -> Result<()> {
        let mut cfg = load_from_str("[logging]\nfilter = \"info,,debug\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn format_override_replaces_file_setting() -> Result<()> {
        let mut cfg = load_from_str("[logging]\nformat = \"compact\"\n")?;
        cfg.logging.apply_format_override(Some("JSON"))?;
        assert_eq!(cfg.logging.format, LogFormat::Json);

        cfg.logging.apply_format_override(None)?;
        cfg.logging.apply_format_override(Some("  "))?;
        assert_eq!(cfg.logging.format, LogFormat::Json);

        assert!(cfg.logging.apply_format_override(Some("xml")).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error_for_strict_load() {
        assert!(load_from_file("/nonexistent-config-for-tests.toml").is_err());
    }
}
