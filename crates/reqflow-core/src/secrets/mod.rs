//! Credential sources
//!
//! Secrets are resolved once while building `Settings`; nothing else in the
//! crate reads the environment.

mod traits;
mod env_store;
mod memory_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
