use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::ProfileStore;
use crate::domain::{Profile, UserId};
use crate::error::StorageError;

/// Stores each profile as `<user_id>.json` inside one directory.
///
/// Saves go to a temporary file first and are renamed into place, so a
/// failure part-way through never leaves a truncated profile behind.
#[derive(Debug, Clone)]
pub struct JsonFileProfileStore {
    dir: PathBuf,
}

impl JsonFileProfileStore {
    /// Creates the directory if it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user_id: &UserId) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(user_id)))
    }
}

/// Keeps ids that are already filename-safe readable and percent-encodes
/// everything else byte by byte.
fn file_stem(user_id: &UserId) -> String {
    let mut stem = String::with_capacity(user_id.as_str().len());
    for byte in user_id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

#[async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Profile, StorageError> {
        let path = self.path_for(user_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(user_id.clone()))
            }
            Err(e) => {
                return Err(StorageError::Unavailable(format!("{}: {}", path.display(), e)))
            }
        };

        let profile: Profile = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", path.display(), e)))?;
        if profile.user_id() != user_id {
            return Err(StorageError::Corrupt(format!(
                "{} holds profile {}",
                path.display(),
                profile.user_id()
            )));
        }
        debug!(path = %path.display(), "Profile loaded");
        Ok(profile)
    }

    async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        let path = self.path_for(profile.user_id());
        let tmp = path.with_extension(format!("json.tmp-{}", Uuid::new_v4().simple()));

        let bytes = serde_json::to_vec_pretty(profile)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::Unavailable(format!("{}: {}", tmp.display(), e)));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            warn!(path = %path.display(), error = %e, "Rename into place failed");
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::Unavailable(format!("{}: {}", path.display(), e)));
        }
        debug!(path = %path.display(), "Profile saved");
        Ok(())
    }
}
