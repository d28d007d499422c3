//! Configuration for site services module

use crate::domain::resolver::ExclusionMode;
use crate::domain::service::{ServiceOptions, DEFAULT_MAX_LABEL_LENGTH};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides, e.g. `SITE_SERVICES_MAX_LABEL_LENGTH`
pub const ENV_PREFIX: &str = "SITE_SERVICES_";

/// Site services configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Catalog file replacing the built-in service catalog
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// How a sitewide exclusion affects later candidates during resolution
    #[serde(default)]
    pub exclusion_mode: ExclusionMode,

    /// Maximum include label length (chars)
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,

    /// Apply database migrations during init
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            exclusion_mode: ExclusionMode::default(),
            max_label_length: default_max_label_length(),
            run_migrations: true,
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file, then `SITE_SERVICES_*` env vars
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.check()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = Figment::new().merge(Yaml::string(yaml)).extract()?;
        config.check()?;
        Ok(config)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            exclusion_mode: self.exclusion_mode,
            max_label_length: self.max_label_length,
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.max_label_length == 0 {
            anyhow::bail!("max_label_length must be greater than zero");
        }
        Ok(())
    }
}

fn default_max_label_length() -> usize {
    DEFAULT_MAX_LABEL_LENGTH
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.exclusion_mode, ExclusionMode::PerCandidate);
        assert_eq!(config.max_label_length, DEFAULT_MAX_LABEL_LENGTH);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_short_circuit_mode() {
        let config = Config::from_yaml_str(
            "exclusion_mode: short_circuit\nmax_label_length: 80\nrun_migrations: false\n",
        )
        .unwrap();
        assert_eq!(config.exclusion_mode, ExclusionMode::ShortCircuit);
        assert_eq!(config.service_options().max_label_length, 80);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_yaml_str("retention_days: 30\n").is_err());
    }

    #[test]
    fn test_zero_label_length_rejected() {
        assert!(Config::from_yaml_str("max_label_length: 0\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site_services.yaml");
        std::fs::write(&path, "catalog_path: /etc/site/catalog.yaml\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(
            config.catalog_path.as_deref(),
            Some(Path::new("/etc/site/catalog.yaml"))
        );
    }
}
