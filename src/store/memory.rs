//! In-memory store for tests and ephemeral hosts

use super::{KeyValueStore, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// HashMap-backed store. Clones share the same map, so a test can keep a
/// handle and inspect what the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.map.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_the_same_map() {
        let store = MemoryStore::new();
        let alias = store.clone();

        store.set("k", "v").await.unwrap();
        assert_eq!(alias.get("k").await.unwrap(), Some("v".to_string()));

        alias.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
