//! File-backed session persistence.
//!
//! The manager only produces and consumes [`SessionSnapshot`]s; this module
//! decides where they live on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use vitrine_core::SessionSnapshot;

/// A session file on disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/vitrine/session.json` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("vitrine/session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw JSON of the saved session, if there is one.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!("No saved session at {:?}", self.path);
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {:?}", self.path))?;
        Ok(Some(raw))
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {parent:?}"))?;
        }
        let json = snapshot.to_json().context("Failed to serialize session")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;
        info!("Saved {} windows to {:?}", snapshot.windows.len(), self.path);
        Ok(())
    }

    /// Forget the saved session. Missing files are fine.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file: {:?}", self.path))?;
            info!("Removed saved session {:?}", self.path);
        }
        Ok(())
    }
}
