// src/infrastructure/security/mod.rs
pub mod consent_store;
pub mod flow_store;
pub mod redis_consent_store;
pub mod secret_hasher;
