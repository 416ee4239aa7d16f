// src/application/ports/security.rs
use crate::application::ApplicationResult;
use crate::domain::client::SecretHash;
use async_trait::async_trait;

/// One-way hash applied to client secrets before storage and comparison.
/// Implementations must be deterministic: the same input always yields the
/// same digest.
#[async_trait]
pub trait SecretHasher: Send + Sync {
    fn algorithm(&self) -> &'static str;

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash>;
}
