use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::store::{StateStore, StoreError};

/// Process-local store with no persistence.
///
/// Values live as long as the process. Used by the degraded deployment and
/// by tests.
#[derive(Default)]
pub struct InMemoryStateStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = InMemoryStateStore::new();
        assert_eq!(store.get("stateValue").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = InMemoryStateStore::new();
        store.set("stateValue", "one").await.unwrap();
        store.set("stateValue", "two").await.unwrap();
        assert_eq!(
            store.get("stateValue").await.unwrap().as_deref(),
            Some("two")
        );
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = InMemoryStateStore::new();
        store.set("a", "1").await.unwrap();
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keeps_arbitrary_characters() {
        let store = InMemoryStateStore::new();
        let value = "a/b?c=d&e f%20 \u{fc}";
        store.set("stateValue", value).await.unwrap();
        assert_eq!(store.get("stateValue").await.unwrap().as_deref(), Some(value));
    }
}
