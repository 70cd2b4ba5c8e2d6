use crate::models::Config;
use crate::utils::{APP_NAME, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and writes `config.toml`
pub struct TomlConfigBackend {
    file_path: PathBuf,
}

impl TomlConfigBackend {
    /// Backend for the per-user config file under the platform config directory
    pub fn new() -> Result<Self> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push(APP_NAME);
        path.push(CONFIG_FILE_NAME);
        Ok(Self { file_path: path })
    }

    /// Backend for an explicit file (`--config`)
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load the config; a missing file means defaults
    pub fn load(&self) -> Result<Config> {
        if !self.file_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", self.file_path.display()))?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::UnknownDurationPolicy;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TomlConfigBackend::at(dir.path().join("absent.toml"));
        assert_eq!(backend.load().unwrap(), Config::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TomlConfigBackend::at(dir.path().join("nested").join(CONFIG_FILE_NAME));

        let config = Config {
            tick_interval_ms: 250,
            unknown_duration: UnknownDurationPolicy::Skip,
            sources: vec!["/media/sintel.ogg".to_string()],
            ..Config::default()
        };
        backend.save(&config).unwrap();

        assert_eq!(backend.load().unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "tick_interval_ms = \"fast\"").unwrap();

        let err = TomlConfigBackend::at(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
