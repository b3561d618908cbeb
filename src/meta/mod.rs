// ===========================================================================
// meta - Save Metadata (firesave-metadata.json)
// ===========================================================================

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub type Result<T> = std::result::Result<T, Error>;

/// Sidecar file name inside each save directory
pub const METADATA_FILE: &str = "firesave-metadata.json";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read metadata: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write metadata: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid metadata in {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid metadata in {}: name must not be empty", .path.display())]
    EmptyName { path: PathBuf },

    #[error("failed to serialize metadata: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Error {
    /// Whether the sidecar exists but its content is unusable
    pub fn is_invalid(&self) -> bool {
        matches!(self, Error::Invalid { .. } | Error::EmptyName { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub save_time: DateTime<Utc>,

    #[serde(default)]
    pub is_autosave: bool,
}

impl SaveMeta {
    /// New record stamped with the current time
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            save_time: Utc::now(),
            is_autosave: false,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn autosave(mut self, is_autosave: bool) -> Self {
        self.is_autosave = is_autosave;
        self
    }

    /// Write the sidecar into `save_dir`, replacing any existing one
    pub fn save(&self, save_dir: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(Error::Serialize)?;
        std::fs::write(path(save_dir), content).map_err(Error::Write)?;
        debug!(name = %self.name, dir = %save_dir.display(), "wrote metadata");
        Ok(())
    }
}

/// Sidecar location for a save directory
pub fn path(save_dir: &Path) -> PathBuf {
    save_dir.join(METADATA_FILE)
}

/// Read the sidecar of a save directory.
///
/// `Ok(None)` means there is no sidecar. Whether an invalid sidecar is fatal
/// is up to the caller.
pub fn read(save_dir: &Path) -> Result<Option<SaveMeta>> {
    let path = path(save_dir);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Read(e)),
    };

    let meta: SaveMeta = serde_json::from_str(&content).map_err(|source| Error::Invalid {
        path: path.clone(),
        source,
    })?;

    if meta.name.is_empty() {
        return Err(Error::EmptyName { path });
    }

    Ok(Some(meta))
}
