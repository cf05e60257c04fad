use anyhow::Context;
use medwell_engine::traits::SessionStorage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Session key-value pairs persisted as one JSON object on disk.
///
/// Reads are served from memory; every write rewrites the file atomically.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStorage {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read(&path)
                .with_context(|| format!("read session: {}", path.display()))?;
            serde_json::from_slice(&raw)
                .with_context(|| format!("decode session JSON: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, change: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if !change(&mut entries) {
            return Ok(());
        }
        let json = serde_json::to_vec_pretty(&*entries).context("encode session JSON")?;
        crate::fs::write_atomic(&self.path, &json)
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStorage::open(&path).unwrap();
        store.set("mw_user_id", "user_1").unwrap();
        store.set("mw_assistant", "dundee").unwrap();
        store.remove("mw_assistant").unwrap();

        let reopened = FileSessionStorage::open(&path).unwrap();
        assert_eq!(reopened.get("mw_user_id").as_deref(), Some("user_1"));
        assert_eq!(reopened.get("mw_assistant"), None);
    }

    #[test]
    fn removing_missing_key_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStorage::open(&path).unwrap();
        store.remove("mw_token").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"[]").unwrap();
        assert!(FileSessionStorage::open(&path).is_err());
    }
}
