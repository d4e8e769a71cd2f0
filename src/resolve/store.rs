use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::error::{AutofillError, Result};
use crate::resolve::profile::UserPreferenceProfile;

/// Per-user profile storage addressed by `/`-separated paths.
pub trait PreferenceStore {
    fn load(&self, user_id: &str) -> Result<Option<UserPreferenceProfile>>;

    /// Last write wins per path.
    fn write(&self, user_id: &str, path: &str, value: &Value) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, UserPreferenceProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, user_id: &str, profile: UserPreferenceProfile) -> Self {
        if let Ok(mut profiles) = self.profiles.lock() {
            profiles.insert(user_id.to_string(), profile);
        }
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, user_id: &str) -> Result<Option<UserPreferenceProfile>> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| AutofillError::Store("memory store lock poisoned".to_string()))?;
        Ok(profiles.get(user_id).cloned())
    }

    fn write(&self, user_id: &str, path: &str, value: &Value) -> Result<()> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| AutofillError::Store("memory store lock poisoned".to_string()))?;
        profiles
            .entry(user_id.to_string())
            .or_default()
            .set(path, value.clone())
    }
}

// ============================================================================
// JSON file store: one `<user_id>.json` document per user
// ============================================================================

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| AutofillError::io(dir.display().to_string(), e))?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn profile_path(&self, user_id: &str) -> Result<PathBuf> {
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AutofillError::Store(format!("invalid user id '{}'", user_id)));
        }
        Ok(self.dir.join(format!("{}.json", user_id)))
    }

    fn read(&self, path: &Path) -> Result<Option<UserPreferenceProfile>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| AutofillError::io(path.display().to_string(), e))?;
        let profile = serde_json::from_str(&raw)
            .map_err(|e| AutofillError::json(path.display().to_string(), e))?;
        Ok(Some(profile))
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self, user_id: &str) -> Result<Option<UserPreferenceProfile>> {
        let path = self.profile_path(user_id)?;
        self.read(&path)
    }

    fn write(&self, user_id: &str, path: &str, value: &Value) -> Result<()> {
        let file = self.profile_path(user_id)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AutofillError::Store("file store lock poisoned".to_string()))?;

        let mut profile = self.read(&file)?.unwrap_or_default();
        profile.set(path, value.clone())?;

        let json = serde_json::to_string_pretty(&profile)
            .map_err(|e| AutofillError::json("profile", e))?;
        fs::write(&file, json).map_err(|e| AutofillError::io(file.display().to_string(), e))?;
        debug!(user = user_id, path, "profile value written");
        Ok(())
    }
}
