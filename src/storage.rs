use crate::error::StoreError;
use std::fs;
use std::path::PathBuf;

/// Key under which the transaction array is kept.
pub const TRANSACTIONS_KEY: &str = "finance-transactions";

/// A flat string key-value store. `set` replaces the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Human readable location of `key`, shown in the header.
    fn location(&self, key: &str) -> String;
}

/// Keeps each key in its own `<key>.json` file inside one directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Write {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        tracing::debug!(path = %path.display(), "reading store value");
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Read {
                key: key.to_string(),
                source,
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        tracing::debug!(path = %path.display(), bytes = value.len(), "writing store value");
        fs::write(&path, value).map_err(|source| StoreError::Write {
            key: key.to_string(),
            source,
        })
    }

    fn location(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

#[cfg(test)]
pub use memory::{FailingStore, MemoryStore};


#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("fintrack-store-{}", Uuid::new_v4())))
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn open_creates_directory() {
        let tmp = TempDir::new();
        FileStore::open(tmp.0.join("nested")).unwrap();

        assert!(tmp.0.join("nested").is_dir());
    }

    #[test]
    fn missing_key_reads_as_none() {
        let tmp = TempDir::new();
        let store = FileStore::open(&tmp.0).unwrap();

        assert!(store.get(TRANSACTIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let tmp = TempDir::new();
        let mut store = FileStore::open(&tmp.0).unwrap();

        store.set(TRANSACTIONS_KEY, "[1,2,3]").unwrap();
        store.set(TRANSACTIONS_KEY, "[]").unwrap();

        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(
            store
                .location(TRANSACTIONS_KEY)
                .ends_with("finance-transactions.json")
        );
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::default();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        let handle = store.clone();
        store.set("k", "w").unwrap();
        assert_eq!(handle.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn failing_store_reads_but_rejects_writes() {
        let mut store = FailingStore::with(TRANSACTIONS_KEY, "[]");

        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
        let err = store.set(TRANSACTIONS_KEY, "[1]").unwrap_err();
        assert!(matches!(err, StoreError::Write { ref key, .. } if key == TRANSACTIONS_KEY));
        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
    }
}
