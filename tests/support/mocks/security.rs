// tests/support/mocks/security.rs
use async_trait::async_trait;
use clientgate::application::{
    ApplicationResult, error::ApplicationError, ports::security::SecretHasher,
};
use clientgate::domain::client::SecretHash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Readable, deterministic "hash" for assertions.
#[derive(Clone, Debug, Default)]
pub struct PlainHasher;

#[async_trait]
impl SecretHasher for PlainHasher {
    fn algorithm(&self) -> &'static str {
        "plain"
    }

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash> {
        Ok(SecretHash::new(format!("plain:{secret}"))?)
    }
}

/// Counts hash calls so tests can see that verification ran.
#[derive(Debug, Default)]
pub struct CountingHasher {
    calls: AtomicUsize,
}

impl CountingHasher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretHasher for CountingHasher {
    fn algorithm(&self) -> &'static str {
        "counting"
    }

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PlainHasher.hash(secret).await
    }
}

/// Provider that is always unavailable.
#[derive(Clone, Debug, Default)]
pub struct BrokenHasher;

#[async_trait]
impl SecretHasher for BrokenHasher {
    fn algorithm(&self) -> &'static str {
        "broken"
    }

    async fn hash(&self, _secret: &str) -> ApplicationResult<SecretHash> {
        Err(ApplicationError::infrastructure("hash provider unavailable"))
    }
}

/// Provider that answers only after `delay`.
#[derive(Clone, Debug)]
pub struct SlowHasher {
    pub delay: Duration,
}

#[async_trait]
impl SecretHasher for SlowHasher {
    fn algorithm(&self) -> &'static str {
        "slow"
    }

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash> {
        tokio::time::sleep(self.delay).await;
        PlainHasher.hash(secret).await
    }
}
