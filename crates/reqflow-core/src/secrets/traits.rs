//! Secret storage trait and errors

use thiserror::Error;

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Store is read-only")]
    ReadOnly,
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Source of credentials consulted once at startup
///
/// Implementations:
/// - `EnvSecretStore`: process environment (after `.env` loading)
/// - `MemorySecretStore`: fixed values for tests
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by provider name (`groq`) or direct key (`GROQ_API_KEY`)
    fn get(&self, key: &str) -> Option<String>;

    /// Store a secret; read-only stores return `SecretStoreError::ReadOnly`
    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
