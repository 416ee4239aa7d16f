// src/infrastructure/security/secret_hasher.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::SecretHasher,
};
use crate::domain::client::SecretHash;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::{fmt, sync::Arc};

/// Base64 of SHA-256, the digest format identity servers conventionally
/// store for client secrets.
#[derive(Default, Clone)]
pub struct Sha256SecretHasher;

#[async_trait]
impl SecretHasher for Sha256SecretHasher {
    fn algorithm(&self) -> &'static str {
        "sha256"
    }

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash> {
        let digest = Sha256::digest(secret.as_bytes());
        Ok(SecretHash::new(STANDARD.encode(digest))?)
    }
}

#[derive(Default, Clone)]
pub struct Blake3SecretHasher;

#[async_trait]
impl SecretHasher for Blake3SecretHasher {
    fn algorithm(&self) -> &'static str {
        "blake3"
    }

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash> {
        let digest = blake3::hash(secret.as_bytes());
        Ok(SecretHash::new(digest.to_hex().to_string())?)
    }
}

/// HMAC-SHA256 keyed with a server-side pepper so that leaked digests
/// cannot be brute-forced offline without the key.
#[derive(Clone)]
pub struct HmacSha256SecretHasher {
    pepper: Vec<u8>,
}

impl HmacSha256SecretHasher {
    pub fn new(pepper: impl Into<Vec<u8>>) -> ApplicationResult<Self> {
        let pepper = pepper.into();
        if pepper.is_empty() {
            return Err(ApplicationError::validation("hmac pepper cannot be empty"));
        }
        Ok(Self { pepper })
    }
}

#[async_trait]
impl SecretHasher for HmacSha256SecretHasher {
    fn algorithm(&self) -> &'static str {
        "hmac-sha256"
    }

    async fn hash(&self, secret: &str) -> ApplicationResult<SecretHash> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.pepper)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        mac.update(secret.as_bytes());
        Ok(SecretHash::new(STANDARD.encode(mac.finalize().into_bytes()))?)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Blake3,
    HmacSha256 { pepper: String },
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::HmacSha256 { .. } => "hmac-sha256",
        }
    }
}

impl fmt::Debug for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::HmacSha256 { .. } => f
                .debug_struct("HmacSha256")
                .field("pepper", &"[redacted]")
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

pub fn build_hasher(algorithm: &HashAlgorithm) -> ApplicationResult<Arc<dyn SecretHasher>> {
    Ok(match algorithm {
        HashAlgorithm::Sha256 => Arc::new(Sha256SecretHasher),
        HashAlgorithm::Blake3 => Arc::new(Blake3SecretHasher),
        HashAlgorithm::HmacSha256 { pepper } => {
            Arc::new(HmacSha256SecretHasher::new(pepper.as_bytes().to_vec())?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sha256_matches_known_digest() {
        // base64(sha256("secret"))
        let hash = Sha256SecretHasher.hash("secret").await.unwrap();
        assert_eq!(hash.as_str(), "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols=");
    }

    #[tokio::test]
    async fn hashers_are_deterministic() {
        for algorithm in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Blake3,
            HashAlgorithm::HmacSha256 {
                pepper: "pepper".into(),
            },
        ] {
            let hasher = build_hasher(&algorithm).unwrap();
            assert_eq!(hasher.algorithm(), algorithm.name());
            let a = hasher.hash("secret").await.unwrap();
            let b = hasher.hash("secret").await.unwrap();
            let c = hasher.hash("Secret").await.unwrap();
            assert_eq!(a, b);
            assert_ne!(a, c);
        }
    }

    #[tokio::test]
    async fn pepper_changes_the_digest() {
        let a = HmacSha256SecretHasher::new("one").unwrap();
        let b = HmacSha256SecretHasher::new("two").unwrap();
        assert_ne!(a.hash("secret").await.unwrap(), b.hash("secret").await.unwrap());
        assert!(HmacSha256SecretHasher::new("").is_err());
    }

    #[test]
    fn algorithm_debug_hides_pepper() {
        let algorithm = HashAlgorithm::HmacSha256 {
            pepper: "pepper-value".into(),
        };
        let rendered = format!("{algorithm:?}");
        assert!(!rendered.contains("pepper-value"));
        assert!(rendered.contains("[redacted]"));
        assert_eq!(format!("{:?}", HashAlgorithm::Blake3), "blake3");
    }
}
