//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Provider names that map to more than the default `<NAME>_API_KEY`
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("ollama", vec![]);
    m
});

/// Read-only store backed by the process environment
///
/// Lookup order for a key: the key itself as a variable name, the provider
/// mapping above, then `<KEY>_API_KEY`. Empty values count as absent.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn non_empty(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = Self::non_empty(key) {
            return Some(value);
        }

        if let Some(vars) = ENV_VAR_MAP.get(key.to_lowercase().as_str()) {
            if let Some(value) = vars.iter().find_map(|v| Self::non_empty(v)) {
                return Some(value);
            }
        }

        Self::non_empty(&format!("{}_API_KEY", key.to_uppercase()))
    }

    fn store(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }
}
