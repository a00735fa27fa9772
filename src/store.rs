use std::io;
use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};

use crate::errors::StoreError;

pub mod memory;

/// A string key-value store, the way mobile platforms expose persistent
/// app storage.
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under the given key, if any.
    fn get(&self, key: &str) -> BoxFuture<Result<Option<String>, StoreError>>;

    /// Stores the given value under the given key, replacing any
    /// previous value.
    fn set(&self, key: &str, value: String) -> BoxFuture<Result<(), StoreError>>;

    /// Removes the given key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> BoxFuture<Result<(), StoreError>>;
}

/// A store that keeps each key in its own JSON file inside a directory.
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates a new instance. The directory is created on first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<Result<Option<String>, StoreError>> {
        read(self.path_for(key), key.to_owned()).boxed()
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<Result<(), StoreError>> {
        write(self.directory.clone(), self.path_for(key), key.to_owned(), value).boxed()
    }

    fn remove(&self, key: &str) -> BoxFuture<Result<(), StoreError>> {
        remove(self.path_for(key), key.to_owned()).boxed()
    }
}

async fn read(path: PathBuf, key: String) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(&path).await {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::ReadFailed { key, source }),
    }
}

async fn write(directory: PathBuf, path: PathBuf, key: String, value: String) -> Result<(), StoreError> {
    let error_handler = |source: io::Error| StoreError::WriteFailed {
        key: key.clone(),
        source,
    };

    tokio::fs::create_dir_all(&directory).await.map_err(error_handler)?;

    // the record is only ever replaced whole
    let staging = path.with_extension("json.partial");
    tokio::fs::write(&staging, value.as_bytes()).await.map_err(error_handler)?;
    tokio::fs::rename(&staging, &path).await.map_err(error_handler)?;

    Ok(())
}

async fn remove(path: PathBuf, key: String) -> Result<(), StoreError> {
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::RemoveFailed { key, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, KeyValueStore};

    #[tokio::test]
    async fn values_survive_a_new_instance() {
        let directory = tempfile::tempdir().expect("create temporary directory");
        let path = directory.path().join("data");

        FileStore::new(&path)
            .set("currentClass", "{\"name\":\"Intro\"}".to_owned())
            .await
            .expect("write value");

        let reopened = FileStore::new(&path);
        let value = reopened.get("currentClass").await.expect("read value");

        assert_eq!(value.as_deref(), Some("{\"name\":\"Intro\"}"));
        assert!(!path.join("currentClass.json.partial").exists());
    }

    #[tokio::test]
    async fn absent_keys_read_as_none_and_remove_cleanly() {
        let directory = tempfile::tempdir().expect("create temporary directory");
        let store = FileStore::new(directory.path());

        assert_eq!(store.get("currentClass").await.expect("read value"), None);
        store.remove("currentClass").await.expect("remove absent key");

        store.set("currentClass", "{}".to_owned()).await.expect("write value");
        store.remove("currentClass").await.expect("remove key");

        assert_eq!(store.get("currentClass").await.expect("read value"), None);
    }
}
