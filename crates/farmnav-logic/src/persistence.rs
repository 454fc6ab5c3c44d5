//! Save/load for a local record list of scores.
//!
//! Scores are written as versioned JSON. The whole list is rewritten on every
//! insert via a temporary file and a rename, so a crash mid-write leaves the
//! previous list intact.
//!
//! [`ScoreStore`] wraps a [`ScoreFile`] and degrades to memory when the file
//! cannot be opened. Write failures are logged and the entry is still served.
//! A store opened with [`ScoreStore::open_or_reset`] instead moves an
//! unparseable file aside to `<name>.corrupt` and starts a fresh list there.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::scores::LOCAL_CAP;
use crate::leaderboard::{Leaderboard, ScoreEntry};

/// Version number for the score file format (increment when format changes)
const FILE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ScoreFileData {
    version: u32,
    entries: Vec<ScoreEntry>,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Score file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Write `board` to a writer.
pub fn save_scores<W: Write>(writer: W, board: &Leaderboard) -> Result<(), PersistenceError> {
    let data = ScoreFileData {
        version: FILE_VERSION,
        entries: board.entries().to_vec(),
    };
    serde_json::to_writer_pretty(writer, &data)?;
    Ok(())
}

/// Read a record list, re-sorting and capping it at `cap`.
pub fn load_scores<R: Read>(reader: R, cap: usize) -> Result<Leaderboard, PersistenceError> {
    let data: ScoreFileData = serde_json::from_reader(reader)?;
    if data.version != FILE_VERSION {
        return Err(PersistenceError::VersionMismatch {
            expected: FILE_VERSION,
            found: data.version,
        });
    }
    Ok(Leaderboard::from_entries(data.entries, cap))
}

/// A leaderboard mirrored to a JSON file.
#[derive(Debug)]
pub struct ScoreFile {
    path: PathBuf,
    board: Leaderboard,
}

impl ScoreFile {
    /// Open the file at `path`. A missing file is an empty list.
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Result<Self, PersistenceError> {
        let path = path.into();
        let board = match fs::File::open(&path) {
            Ok(file) => load_scores(io::BufReader::new(file), cap)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Leaderboard::new(cap),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Loaded {} scores from {}", board.len(), path.display());
        Ok(Self { path, board })
    }

    /// Like [`open`](Self::open), but a file that cannot be parsed or has an
    /// unknown version is renamed to `<name>.corrupt` and replaced by an empty
    /// list. Other I/O errors still fail.
    pub fn open_or_reset(path: impl Into<PathBuf>, cap: usize) -> Result<Self, PersistenceError> {
        let path = path.into();
        match Self::open(path.clone(), cap) {
            Err(e @ (PersistenceError::Json(_) | PersistenceError::VersionMismatch { .. })) => {
                let aside = with_suffix(&path, ".corrupt");
                match fs::rename(&path, &aside) {
                    Ok(()) => log::warn!(
                        "Score file {} unreadable ({}), moved to {}",
                        path.display(),
                        e,
                        aside.display()
                    ),
                    Err(rename) => log::warn!(
                        "Score file {} unreadable ({}) and not moved ({}), starting over",
                        path.display(),
                        e,
                        rename
                    ),
                }
                Ok(Self {
                    path,
                    board: Leaderboard::new(cap),
                })
            }
            other => other,
        }
    }

    /// Insert and persist. The in-memory list keeps the entry even when the
    /// write fails.
    pub fn insert(&mut self, entry: ScoreEntry) -> Result<bool, PersistenceError> {
        let kept = self.board.insert(entry);
        self.save()?;
        Ok(kept)
    }

    pub fn save(&self) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = with_suffix(&self.path, ".tmp");
        {
            let mut writer = io::BufWriter::new(fs::File::create(&tmp)?);
            save_scores(&mut writer, &self.board)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }
}

/// Score list backed by a file when possible, memory otherwise.
#[derive(Debug)]
pub enum ScoreStore {
    /// Not persisted; capped at [`LOCAL_CAP`].
    Memory(Leaderboard),
    File(ScoreFile),
}

impl ScoreStore {
    pub fn in_memory() -> Self {
        Self::Memory(Leaderboard::new(LOCAL_CAP))
    }

    /// Open the score file at `path` capped at `file_cap`, degrading to
    /// memory when there is no path or the file cannot be read.
    pub fn open(path: Option<&Path>, file_cap: usize) -> Self {
        Self::open_with(path, |p| ScoreFile::open(p, file_cap))
    }

    /// Open the score file at `path`, replacing it if it is unreadable.
    /// Only an I/O failure degrades to memory.
    pub fn open_or_reset(path: Option<&Path>, file_cap: usize) -> Self {
        Self::open_with(path, |p| ScoreFile::open_or_reset(p, file_cap))
    }

    fn open_with(
        path: Option<&Path>,
        open: impl FnOnce(&Path) -> Result<ScoreFile, PersistenceError>,
    ) -> Self {
        let Some(path) = path else {
            log::info!("No score file configured, keeping scores in memory");
            return Self::in_memory();
        };
        match open(path) {
            Ok(file) => {
                log::info!(
                    "Scores persisted to {} ({} loaded)",
                    path.display(),
                    file.board().len()
                );
                Self::File(file)
            }
            Err(e) => {
                log::warn!(
                    "Could not open score file {}, keeping scores in memory: {}",
                    path.display(),
                    e
                );
                Self::in_memory()
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn save(&mut self, entry: ScoreEntry) {
        match self {
            Self::Memory(board) => {
                board.insert(entry);
            }
            Self::File(file) => {
                if let Err(e) = file.insert(entry) {
                    log::warn!("Score file write failed, entry kept in memory: {}", e);
                }
            }
        }
    }

    /// Up to `n` best scores, highest first.
    pub fn top(&self, n: usize) -> Vec<ScoreEntry> {
        self.board().top(n).to_vec()
    }

    pub fn board(&self) -> &Leaderboard {
        match self {
            Self::Memory(board) => board,
            Self::File(file) => file.board(),
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}
