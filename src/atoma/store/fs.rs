use super::StateStore;
use crate::document::SavedDocument;
use crate::error::{AtomaError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const AUTOSAVE_FILENAME: &str = "autosave.json";

/// File-backed store: one `autosave.json` under the app data directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn autosave_path(&self) -> PathBuf {
        self.root.join(AUTOSAVE_FILENAME)
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| {
                AtomaError::Store(format!(
                    "Cannot create data directory {}: {}",
                    self.root.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<SavedDocument>> {
        let path = self.autosave_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(AtomaError::Io)?;
        let doc: SavedDocument = serde_json::from_str(&content)?;
        Ok(Some(doc))
    }

    fn save(&mut self, doc: &SavedDocument) -> Result<()> {
        self.ensure_root()?;
        let content = serde_json::to_string_pretty(doc)?;
        fs::write(self.autosave_path(), content).map_err(AtomaError::Io)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.autosave_path();
        if path.exists() {
            fs::remove_file(path).map_err(AtomaError::Io)?;
        }
        Ok(())
    }
}

/// Resolve the store root: `ATOMA_HOME` when set, otherwise the platform
/// data directory.
pub fn default_root() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("ATOMA_HOME") {
        return Ok(Path::new(&home).join(".atoma"));
    }
    directories::ProjectDirs::from("com", "atoma", "atoma")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| AtomaError::Store("Could not determine a data directory".to_string()))
}
