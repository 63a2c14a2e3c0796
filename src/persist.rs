use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::session::SavedRound;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("store encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host-managed storage for a round interrupted mid-play.
///
/// The pair is opaque to the store; loading never fails, anything unreadable
/// is reported as "nothing saved".
pub trait RoundStore {
    fn load(&self) -> Option<SavedRound>;
    fn save(&self, round: &SavedRound) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileRoundStore {
    path: PathBuf,
}

impl FileRoundStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::saved_round_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileRoundStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundStore for FileRoundStore {
    fn load(&self) -> Option<SavedRound> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice::<SavedRound>(&bytes) {
            Ok(round) => Some(round),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed saved round");
                None
            }
        }
    }

    fn save(&self, round: &SavedRound) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec(round)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = FileRoundStore::with_path(dir.path().join("state").join("round.json"));
        let round = SavedRound {
            score: 4,
            time_left: 6,
        };
        store.save(&round).unwrap();
        assert_eq!(store.load(), Some(round));
    }

    #[test]
    fn missing_file_is_nothing_saved() {
        let dir = tempdir().unwrap();
        let store = FileRoundStore::with_path(dir.path().join("round.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn malformed_file_is_nothing_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("round.json");
        fs::write(&path, br#"{"score":"four"}"#).unwrap();
        assert_eq!(FileRoundStore::with_path(&path).load(), None);

        fs::write(&path, br#"{"score":-1,"time_left":3}"#).unwrap();
        assert_eq!(FileRoundStore::with_path(&path).load(), None);
    }

    #[test]
    fn clear_removes_and_tolerates_absence() {
        let dir = tempdir().unwrap();
        let store = FileRoundStore::with_path(dir.path().join("round.json"));
        store
            .save(&SavedRound {
                score: 1,
                time_left: 1,
            })
            .unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        assert_matches!(store.clear(), Ok(()));
    }
}
