//! Session store trait.

use hireloop_types::error::RepositoryError;

/// Namespaced key-value persistent storage.
///
/// Stores arbitrary JSON values keyed by `(namespace, key)`. hireloop uses
/// two namespaces: the applicant registry and the conversation records.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        namespace: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. No-op if the key does not exist.
    fn delete(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
