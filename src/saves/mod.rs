// ===========================================================================
// saves - Save Directory Management
// ===========================================================================
//
// Each save is a subdirectory of the save root holding the emulator export
// plus a firesave-metadata.json sidecar.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::meta::{self, SaveMeta};
use crate::process::{self, Emulator};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Illegal characters used: {}", quote_chars(.chars))]
    IllegalName { name: String, chars: Vec<char> },

    #[error("save name must not be empty")]
    EmptyName,

    #[error("save '{0}' not found")]
    NotFound(String),

    #[error("save '{0}' already exists")]
    AlreadyExists(String),

    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Meta(#[from] meta::Error),

    #[error(transparent)]
    Process(#[from] process::Error),

    #[error("failed to copy save: {0}")]
    Walk(#[from] ignore::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn quote_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Name Validation
// ---------------------------------------------------------------------------

fn is_legal_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-')
}

/// Every offending character of a save name, in order.
///
/// A trailing `.` is reported as well, since directories cannot portably end
/// with one.
pub fn illegal_chars(name: &str) -> Vec<char> {
    let mut chars: Vec<char> = name.chars().filter(|&c| !is_legal_char(c)).collect();
    if name.ends_with('.') {
        chars.push('.');
    }
    chars
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let chars = illegal_chars(name);
    if !chars.is_empty() {
        return Err(Error::IllegalName {
            name: name.to_string(),
            chars,
        });
    }

    Ok(())
}

/// Validated directory of a save
pub fn save_path(config: &Config, name: &str) -> Result<PathBuf> {
    validate_name(name)?;
    Ok(config.save_path(name))
}

/// Directory of a save that must already exist
fn existing_save(config: &Config, name: &str) -> Result<PathBuf> {
    let path = save_path(config, name)?;
    if !path.is_dir() {
        return Err(Error::NotFound(name.to_string()));
    }
    Ok(path)
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Export the emulator into the named save and record its metadata.
///
/// Without a new description the previous one is kept. Nothing is recorded
/// if the export fails.
pub fn create_or_update(
    config: &Config,
    emulator: &dyn Emulator,
    name: &str,
    description: Option<&str>,
    is_autosave: bool,
) -> Result<SaveMeta> {
    let dir = save_path(config, name)?;

    std::fs::create_dir_all(&dir).map_err(|source| Error::CreateDir {
        path: dir.clone(),
        source,
    })?;

    // Read before exporting; a corrupt sidecar must stop the save
    let previous = meta::read(&dir)?;

    emulator.export(&dir)?;

    let description = description
        .map(str::to_string)
        .or_else(|| previous.and_then(|m| m.description));

    let meta = SaveMeta::new(name)
        .with_description(description)
        .autosave(is_autosave);
    meta.save(&dir)?;

    debug!(save = name, dir = %dir.display(), is_autosave, "save recorded");
    Ok(meta)
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Metadata of every readable save, in directory listing order.
///
/// Sidecars are read concurrently. Saves without a usable sidecar are
/// skipped. A save root that is missing or not a directory is an empty list.
pub fn list(config: &Config) -> Result<Vec<SaveMeta>> {
    let entries = match std::fs::read_dir(&config.save_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound || !config.save_dir.is_dir() => {
            debug!(dir = %config.save_dir.display(), error = %e, "no save root");
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();

    let metas: Vec<SaveMeta> = std::thread::scope(|scope| {
        let handles: Vec<_> = dirs
            .iter()
            .map(|dir| scope.spawn(move || meta::read(dir)))
            .collect();

        handles
            .into_iter()
            .zip(&dirs)
            .filter_map(|(handle, dir)| match handle.join() {
                Ok(Ok(Some(meta))) => Some(meta),
                Ok(Ok(None)) => {
                    debug!(dir = %dir.display(), "no metadata, skipping");
                    None
                }
                Ok(Err(e)) => {
                    warn!(dir = %dir.display(), error = %e, "skipping save");
                    None
                }
                Err(_) => {
                    warn!(dir = %dir.display(), "metadata reader panicked, skipping save");
                    None
                }
            })
            .collect()
    });

    Ok(metas)
}

// ---------------------------------------------------------------------------
// Copy / Delete
// ---------------------------------------------------------------------------

/// Duplicate a save under a new name.
///
/// Returns the copy's metadata when the source had any.
pub fn copy(config: &Config, source: &str, target: &str) -> Result<Option<SaveMeta>> {
    let from = existing_save(config, source)?;
    let to = save_path(config, target)?;

    if to.exists() {
        return Err(Error::AlreadyExists(target.to_string()));
    }

    let meta = meta::read(&from)?;

    if let Err(e) = copy_tree(&from, &to) {
        std::fs::remove_dir_all(&to).ok();
        return Err(e);
    }

    let meta = match meta {
        Some(mut meta) => {
            meta.name = target.to_string();
            meta.save(&to)?;
            Some(meta)
        }
        None => None,
    };

    debug!(from = source, to = target, "save copied");
    Ok(meta)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    use ignore::WalkBuilder;

    // Copy everything, including hidden and gitignored files
    let walker = WalkBuilder::new(from).standard_filters(false).build();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(from) else {
            continue;
        };
        let dest = to.join(rel);

        if entry.file_type().is_some_and(|t| t.is_dir()) {
            std::fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(path, &dest)?;
        }
    }

    Ok(())
}

/// Remove a save and everything in it
pub fn delete(config: &Config, name: &str) -> Result<()> {
    let dir = existing_save(config, name)?;
    std::fs::remove_dir_all(&dir)?;
    debug!(save = name, dir = %dir.display(), "save deleted");
    Ok(())
}
