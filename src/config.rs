use anyhow::{Context, Result};
use facematch_core::session::{validate_threshold, DEFAULT_THRESHOLD};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub static CONFIG_PATH: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(option_env!("FACEMATCH_CONFIG_PATH").unwrap_or("/usr/local/etc/facematch/config.toml"))
});

pub static REGISTRY_PATH: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(
        option_env!("FACEMATCH_REGISTRY_PATH").unwrap_or("/usr/local/etc/facematch/registry.json"),
    )
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub threshold: f32,
    pub registry: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            registry: REGISTRY_PATH.to_path_buf(),
        }
    }
}

/// Registry and threshold a `match` run ends up using.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSettings {
    pub registry: PathBuf,
    pub threshold: f32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold).context("invalid threshold in config")?;
        Ok(())
    }

    /// Apply command line overrides. Only the threshold actually used is
    /// checked, so a flag can stand in for a bad value in the file.
    pub fn match_settings(
        &self,
        registry: Option<PathBuf>,
        threshold: Option<f32>,
    ) -> Result<MatchSettings> {
        let settings = MatchSettings {
            registry: registry.unwrap_or_else(|| self.registry.clone()),
            threshold: threshold.unwrap_or(self.threshold),
        };
        match threshold {
            Some(t) => validate_threshold(t).context("invalid --threshold")?,
            None => self.validate()?,
        }
        Ok(settings)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Write the default config if none exists yet. An existing file is left
/// alone, even when it does not parse, so it can still be edited.
pub fn ensure_config(path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if path.exists() {
        return Ok(());
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("writing default config to {}", path.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
