//! Session persistence.
//!
//! The session document is saved as a whole after every mutation and
//! loaded once at startup, mirroring how the frontend kept its state
//! under a single storage key. The trait seam keeps the controller
//! independent of where the document actually lives.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::session::Session;

/// Storage key the session document lives under.
pub const STORAGE_NAME: &str = "b0rguii-storage";

/// Error types for session persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO failure on the backing file
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Document did not parse or serialize
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where session state is saved between runs.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted session, if one was ever saved.
    async fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Persist the whole session document.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;
}

/// File-backed store keeping the session as pretty-printed JSON.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing `b0rguii-storage.json` under `dir`,
    /// creating the directory if needed.
    pub async fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.json", STORAGE_NAME));

        info!(path = %path.display(), "Initialized session store");

        Ok(Self { path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let session = serde_json::from_slice(&bytes)?;
                debug!(path = %self.path.display(), "Loaded session document");
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(session)?;

        // Write a sibling file and rename it over the old document, so
        // an interrupted save cannot leave a truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = json.len(), "Saved session document");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<Option<Session>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        *state = Some(session.clone());
        Ok(())
    }
}
