use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use futures::future::{self, BoxFuture, FutureExt};

use crate::errors::StoreError;
use crate::store::KeyValueStore;

/// A store that keeps everything in process memory. Nothing survives a
/// restart, which is what a browser-like target without durable storage
/// gets, and what tests want.
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
    refuse_writes: AtomicBool,
    refuse_removals: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn refuse_writes(&self, refuse: bool) {
        self.refuse_writes.store(refuse, Ordering::SeqCst);
    }

    /// Makes every subsequent `remove` fail (or succeed again).
    pub fn refuse_removals(&self, refuse: bool) {
        self.refuse_removals.store(refuse, Ordering::SeqCst);
    }

    /// Returns whether anything is stored under the key.
    pub fn contains(&self, key: &str) -> bool {
        self.map.read().unwrap().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<Result<Option<String>, StoreError>> {
        let value = self.map.read().unwrap().get(key).cloned();

        future::ready(Ok(value)).boxed()
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<Result<(), StoreError>> {
        let result = if self.refuse_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("writes to {} are refused", key)))
        } else {
            self.map.write().unwrap().insert(key.to_owned(), value);
            Ok(())
        };

        future::ready(result).boxed()
    }

    fn remove(&self, key: &str) -> BoxFuture<Result<(), StoreError>> {
        let result = if self.refuse_removals.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("removal of {} is refused", key)))
        } else {
            self.map.write().unwrap().remove(key);
            Ok(())
        };

        future::ready(result).boxed()
    }
}
