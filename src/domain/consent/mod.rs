// src/domain/consent/mod.rs
pub mod entity;
pub mod repository;

pub use entity::{
    ConsentRecord, ConsentStatus, MAX_CONSENT_LIFETIME_SECS, SubjectId, consent_lifetime_from_secs,
};
pub use repository::ConsentStore;
