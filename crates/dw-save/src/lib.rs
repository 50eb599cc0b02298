//! dw-save: Save/restore for doorway sessions
//!
//! A save file is pretty JSON holding a small header and a
//! [`SessionSnapshot`]. The room graph itself is never written; it is
//! rebuilt from the snapshot's seed when the session is restored.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use dw_core::{SessionId, SessionSnapshot};

/// Extension of save files in a save directory
pub const SAVE_EXTENSION: &str = "json";

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Invalid save file header")]
    InvalidHeader,

    #[error("Save file belongs to session {found:?}, expected {expected:?}")]
    WrongSession { expected: SessionId, found: SessionId },
}

/// Save file header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Session the snapshot belongs to
    pub session: SessionId,
    /// Seconds since the Unix epoch at save time
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "DWRS";

    pub fn new(session: &SessionId) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            session: session.clone(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        Ok(())
    }
}

/// Complete save file structure
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub snapshot: SessionSnapshot,
}

/// Header-only view, so listing does not materialize the whole state
#[derive(Deserialize)]
struct HeaderOnly {
    header: SaveHeader,
}

/// Write a session snapshot to `path`
pub fn save_session(
    id: &SessionId,
    snapshot: &SessionSnapshot,
    path: impl AsRef<Path>,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    let save_file = SaveFile {
        header: SaveHeader::new(id),
        snapshot: snapshot.clone(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &save_file)?;
    info!(session = %id, path = %path.display(), "session saved");
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, SaveError> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SaveError::NotFound),
        Err(e) => Err(e.into()),
    }
}

/// Load a session snapshot from `path`
pub fn load_session(path: impl AsRef<Path>) -> Result<SessionSnapshot, SaveError> {
    let path = path.as_ref();
    let save_file: SaveFile = serde_json::from_reader(open(path)?)?;
    save_file.header.validate()?;
    debug!(
        session = %save_file.header.session,
        path = %path.display(),
        "session loaded"
    );
    Ok(save_file.snapshot)
}

/// Load the snapshot saved for `id`, rejecting files written by another session
pub fn load_session_for(
    path: impl AsRef<Path>,
    id: &SessionId,
) -> Result<SessionSnapshot, SaveError> {
    let path = path.as_ref();
    let save_file: SaveFile = serde_json::from_reader(open(path)?)?;
    save_file.header.validate()?;
    if save_file.header.session != *id {
        return Err(SaveError::WrongSession {
            expected: id.clone(),
            found: save_file.header.session,
        });
    }
    debug!(session = %id, path = %path.display(), "session loaded");
    Ok(save_file.snapshot)
}

/// Load only the header from a save file (for listing)
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    let only: HeaderOnly = serde_json::from_reader(open(path.as_ref())?)?;
    only.header.validate()?;
    Ok(only.header)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SaveError::NotFound),
        Err(e) => Err(e.into()),
    }
}

/// Path of the save file for `id` inside `dir`
///
/// ASCII letters, digits and `-` are kept; every other byte is written as
/// `_` and two hex digits, so distinct ids never share a file.
pub fn session_path(dir: impl AsRef<Path>, id: &SessionId) -> PathBuf {
    let mut stem = String::with_capacity(id.as_str().len());
    for b in id.as_str().bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            stem.push(char::from(b));
        } else {
            stem.push_str(&format!("_{b:02x}"));
        }
    }
    if stem.is_empty() {
        stem.push('_');
    }
    dir.as_ref().join(format!("{stem}.{SAVE_EXTENSION}"))
}

/// Default save directory, created if missing
pub fn default_save_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("doorway");
    path.push("saves");
    fs::create_dir_all(&path).ok();
    path
}

/// List the save files in `dir`, newest first
///
/// Files that are not valid saves are skipped.
pub fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, SaveHeader)>, SaveError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut saves = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == SAVE_EXTENSION) {
            match load_header(&path) {
                Ok(header) => saves.push((path, header)),
                Err(e) => debug!(path = %path.display(), error = %e, "skipping save"),
            }
        }
    }

    saves.sort_by(|a, b| {
        b.1.timestamp
            .cmp(&a.1.timestamp)
            .then_with(|| a.1.session.cmp(&b.1.session))
    });
    Ok(saves)
}
