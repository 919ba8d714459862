//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretStore, SecretStoreResult};

/// Read-write store holding secrets in memory, mainly for tests
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` pairs
    pub fn with_secrets<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            secrets: RwLock::new(
                initial
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        let secrets = self.secrets.read();
        secrets
            .get(key)
            .or_else(|| secrets.get(&key.to_lowercase()))
            .cloned()
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        self.secrets.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_read_write() {
        let store = MemorySecretStore::with_secrets([("groq", "gsk-1")]);
        assert_eq!(store.get("groq"), Some("gsk-1".to_string()));
        assert_eq!(store.get("GROQ"), Some("gsk-1".to_string()));

        store.store("openai", "sk-2").unwrap();
        assert!(store.has("openai"));
        assert!(!store.has("anthropic"));
    }
}
