// src/application/services/secret_verifier.rs
use crate::application::ports::security::SecretHasher;
use crate::domain::client::{ClientSecret, SecretHash};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use subtle::{Choice, ConstantTimeEq};

pub const DEFAULT_HASH_TIMEOUT: Duration = Duration::from_millis(500);

/// Checks a presented client secret against stored hashes.
///
/// Every failure mode (provider error, timeout, no active secret, mismatch)
/// reports `false`. The presented secret is never logged.
pub struct SecretVerifier {
    hasher: Arc<dyn SecretHasher>,
    timeout: Duration,
}

impl SecretVerifier {
    pub fn new(hasher: Arc<dyn SecretHasher>, timeout: Duration) -> Self {
        Self { hasher, timeout }
    }

    pub async fn verify_hash(&self, presented: &str, stored: &SecretHash) -> bool {
        match self.digest(presented).await {
            Some(digest) => bool::from(digest.as_bytes().ct_eq(stored.as_bytes())),
            None => false,
        }
    }

    /// True iff `presented` matches any secret still active at `now`.
    /// The presented value is hashed even when nothing can match so that
    /// public and unknown clients cost the same as a mismatch.
    pub async fn verify(
        &self,
        presented: &str,
        stored: &[ClientSecret],
        now: DateTime<Utc>,
    ) -> bool {
        let Some(digest) = self.digest(presented).await else {
            return false;
        };

        let mut matched = Choice::from(0);
        for secret in stored.iter().filter(|s| s.is_active(now)) {
            matched |= digest.as_bytes().ct_eq(secret.hash.as_bytes());
        }
        matched.into()
    }

    async fn digest(&self, presented: &str) -> Option<SecretHash> {
        match tokio::time::timeout(self.timeout, self.hasher.hash(presented)).await {
            Ok(Ok(digest)) => Some(digest),
            Ok(Err(err)) => {
                tracing::warn!(
                    algorithm = self.hasher.algorithm(),
                    error = %err,
                    "secret hash provider failed"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    algorithm = self.hasher.algorithm(),
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "secret hash provider timed out"
                );
                None
            }
        }
    }
}
