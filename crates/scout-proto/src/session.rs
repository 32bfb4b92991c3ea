//! Device-local session persistence.
//!
//! Two facts survive navigation and restarts: the user's preference profile
//! (overwritten wholesale on every form submission) and whether an upload
//! has ever succeeded for this session lineage. Both live in one JSON file;
//! a missing or unreadable file is the valid "no personalization yet"
//! state, never an error.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::PreferenceProfile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    profile: Option<PreferenceProfile>,
    #[serde(default)]
    upload_seen: bool,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> SessionFile {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("session file unreadable, starting fresh: {}", e);
                SessionFile::default()
            }),
            Err(_) => SessionFile::default(),
        }
    }

    fn write(&self, file: &SessionFile) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// The saved profile, or `None` when the user hasn't submitted the
    /// preference form yet.
    pub fn load_profile(&self) -> Option<PreferenceProfile> {
        self.read().profile
    }

    /// Overwrite the persisted profile.
    pub fn save_profile(&self, profile: &PreferenceProfile) -> anyhow::Result<()> {
        let mut file = self.read();
        file.profile = Some(profile.clone());
        self.write(&file)
    }

    pub fn clear_profile(&self) -> anyhow::Result<()> {
        let mut file = self.read();
        file.profile = None;
        self.write(&file)
    }

    /// Whether an upload has ever succeeded in this session lineage.
    pub fn upload_seen(&self) -> bool {
        self.read().upload_seen
    }

    pub fn mark_upload_seen(&self) -> anyhow::Result<()> {
        let mut file = self.read();
        file.upload_seen = true;
        self.write(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_load_after_save_returns_same_profile() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut profile = PreferenceProfile::new();
        profile.set("genre", "rock");
        profile.set("mood", "energetic");
        profile.set("min_year", 1990.0);

        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile(), Some(profile));
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.load_profile(), None);
        assert!(!store.upload_seen());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut first = PreferenceProfile::new();
        first.set("genre", "rock");
        first.set("artist", "Neon Owls");
        store.save_profile(&first).unwrap();

        let mut second = PreferenceProfile::new();
        second.set("mood", "calm");
        store.save_profile(&second).unwrap();

        // No merge: the old artist/genre keys must be gone.
        assert_eq!(store.load_profile(), Some(second));
    }

    #[test]
    fn test_upload_flag_survives_and_is_independent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let mut profile = PreferenceProfile::new();
        profile.set("genre", "jazz");
        store.save_profile(&profile).unwrap();
        store.mark_upload_seen().unwrap();

        // Reopen from the same path, as a fresh process would.
        let reopened = SessionStore::new(dir.path().join("session.json"));
        assert!(reopened.upload_seen());
        assert_eq!(reopened.load_profile(), Some(profile.clone()));

        reopened.clear_profile().unwrap();
        assert_eq!(reopened.load_profile(), None);
        assert!(reopened.upload_seen());
    }

    #[test]
    fn test_corrupt_file_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::new(path);
        assert_eq!(store.load_profile(), None);
        assert!(!store.upload_seen());
    }
}
