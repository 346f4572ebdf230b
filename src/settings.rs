use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;

use crate::error::SettingsError;
use crate::types::settings::UserSettings;

/// Storage for per-user settings. Implementations replace a user's settings
/// as a whole; there is no partial update.
pub trait SettingsRepository: Send + Sync {
    fn get(&self, user_id: &str) -> Result<Option<UserSettings>, SettingsError>;
    fn put(&self, user_id: &str, settings: &UserSettings) -> Result<(), SettingsError>;
}

/// All users in one JSON object on disk, read in full and rewritten in full.
///
/// The write lock only covers this process. Two requests for the same user
/// can still interleave their read-modify-write cycles and the later `put`
/// wins.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, UserSettings>, SettingsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, all: &BTreeMap<String, UserSettings>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(all)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsRepository for JsonFileSettingsStore {
    fn get(&self, user_id: &str) -> Result<Option<UserSettings>, SettingsError> {
        Ok(self.read_all()?.remove(user_id))
    }

    fn put(&self, user_id: &str, settings: &UserSettings) -> Result<(), SettingsError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut all = self.read_all()?;
        all.insert(user_id.to_string(), settings.clone());
        self.write_all(&all)?;
        tracing::debug!(user_id = %user_id, path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettingsStore {
    users: DashMap<String, UserSettings>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRepository for InMemorySettingsStore {
    fn get(&self, user_id: &str) -> Result<Option<UserSettings>, SettingsError> {
        Ok(self.users.get(user_id).map(|entry| entry.value().clone()))
    }

    fn put(&self, user_id: &str, settings: &UserSettings) -> Result<(), SettingsError> {
        self.users.insert(user_id.to_string(), settings.clone());
        Ok(())
    }
}
