use crate::error::{AtomaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for atoma, stored as config.json next to the autosave.
/// The color theme is not configuration — it travels with the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AtomaConfig {
    /// Where exports land. Defaults to the current directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl AtomaConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(AtomaError::Io)?;
        let config: AtomaConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(AtomaError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).map_err(AtomaError::Io)?;
        Ok(())
    }

    /// Resolved export directory: configured path, else the current dir.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AtomaConfig::load(dir.path()).unwrap();
        assert_eq!(config, AtomaConfig::default());
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn config_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let config = AtomaConfig {
            export_dir: Some(PathBuf::from("/tmp/exports")),
        };
        config.save(dir.path()).unwrap();

        let loaded = AtomaConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn corrupt_config_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "oops").unwrap();
        assert!(AtomaConfig::load(dir.path()).is_err());
    }
}
