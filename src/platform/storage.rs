//! Best-score storage
//!
//! Features:
//! - Versionless JSON record (`{"best_score": N}`)
//! - Atomic file replace on native (tmp -> save)
//! - LocalStorage on web
//! - In-memory store for tests and headless runs

use thiserror::Error;

use crate::best_score::BestScoreRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored best score is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
}

/// Key/value store for the single best-score scalar
pub trait ScoreStore {
    /// Stored best score (0 when nothing was stored yet)
    fn load(&mut self) -> Result<u64, StoreError>;

    /// Store and flush
    fn persist(&mut self, best_score: u64) -> Result<(), StoreError>;
}

/// Load the best score, degrading to 0 on any failure
pub fn load_best_score(store: &mut dyn ScoreStore) -> u64 {
    match store.load() {
        Ok(best) => {
            log::info!("Loaded best score {}", best);
            best
        }
        Err(e) => {
            log::warn!("Could not load best score, starting at 0: {}", e);
            0
        }
    }
}

/// Keeps the value in memory and records every write
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u64,
    writes: Vec<u64>,
}

impl MemoryStore {
    pub fn new(value: u64) -> Self {
        Self {
            value,
            writes: Vec::new(),
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Every persisted value, oldest first
    pub fn writes(&self) -> &[u64] {
        &self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64, StoreError> {
        Ok(self.value)
    }

    fn persist(&mut self, best_score: u64) -> Result<(), StoreError> {
        self.value = best_score;
        self.writes.push(best_score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};

    use super::{BestScoreRecord, ScoreStore, StoreError};

    /// Environment variable overriding the save file location
    pub const SAVE_PATH_ENV: &str = "CUBE_POP_SAVE";
    const DEFAULT_FILE: &str = "cube_pop_best.json";

    /// JSON file on disk
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `$CUBE_POP_SAVE`, or `cube_pop_best.json` in the working directory
        pub fn from_env() -> Self {
            let path = std::env::var_os(SAVE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));
            Self::new(path)
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn tmp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone().into_os_string();
            tmp.push(".tmp");
            PathBuf::from(tmp)
        }
    }

    impl ScoreStore for FileStore {
        fn load(&mut self) -> Result<u64, StoreError> {
            match fs::read_to_string(&self.path) {
                Ok(json) => Ok(BestScoreRecord::from_json(&json)?.best_score),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
                Err(e) => Err(e.into()),
            }
        }

        fn persist(&mut self, best_score: u64) -> Result<(), StoreError> {
            let json = BestScoreRecord { best_score }.to_json()?;
            let tmp = self.tmp_path();
            {
                let mut file = fs::File::create(&tmp)?;
                file.write_all(json.as_bytes())?;
                file.sync_all()?;
            }
            fs::rename(&tmp, &self.path)?;
            log::debug!("Best score {} saved to {}", best_score, self.path.display());
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{BestScoreRecord, ScoreStore, StoreError};

    /// Browser LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        const STORAGE_KEY: &'static str = "cube_pop_best_score";

        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StoreError::Unavailable("LocalStorage"))
        }
    }

    impl ScoreStore for LocalStorageStore {
        fn load(&mut self) -> Result<u64, StoreError> {
            let storage = Self::storage()?;
            match storage.get_item(Self::STORAGE_KEY) {
                Ok(Some(json)) => Ok(BestScoreRecord::from_json(&json)?.best_score),
                Ok(None) => Ok(0),
                Err(_) => Err(StoreError::Unavailable("LocalStorage read")),
            }
        }

        fn persist(&mut self, best_score: u64) -> Result<(), StoreError> {
            let storage = Self::storage()?;
            let json = BestScoreRecord { best_score }.to_json()?;
            storage
                .set_item(Self::STORAGE_KEY, &json)
                .map_err(|_| StoreError::Unavailable("LocalStorage write"))?;
            log::info!("Best score {} saved", best_score);
            Ok(())
        }
    }
}

/// Platform default store
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn ScoreStore> {
    Box::new(FileStore::from_env())
}

/// Platform default store
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn ScoreStore> {
    Box::new(LocalStorageStore)
}
