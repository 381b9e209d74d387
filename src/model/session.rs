//! Process-wide session context holding the bearer token

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

/// Storage key the access token is persisted under
pub const TOKEN_STORAGE_KEY: &str = "access";

/// Single bearer token shared by the API client and the screens.
///
/// The token is written at login, read for every request and removed at
/// logout. There is no refresh or expiry handling.
#[derive(Clone)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
    path: Arc<PathBuf>,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            path: Arc::new(data_dir.join(TOKEN_STORAGE_KEY)),
        }
    }

    /// Load a previously stored token, if any
    pub async fn load_from_disk(&self) -> Result<bool> {
        let path = self.path.as_path();
        if !path.exists() {
            return Ok(false);
        }

        let content = fs::read_to_string(path)?;
        let token = content.trim();
        if token.is_empty() {
            return Ok(false);
        }

        *self.token.write().await = Some(token.to_string());
        tracing::debug!("Loaded stored session token");
        Ok(true)
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn set(&self, token: String) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(self.path.as_path(), &token)?;
        *self.token.write().await = Some(token);
        tracing::info!("Session token stored");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        if self.path.exists() {
            fs::remove_file(self.path.as_path())?;
        }
        tracing::info!("Session token cleared");
        Ok(())
    }
}
