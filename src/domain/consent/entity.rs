// src/domain/consent/entity.rs
use crate::domain::client::{ClientId, ScopeSet};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("subject id cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One consent decision per (subject, client) pair; a newer decision
/// replaces the older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub subject_id: SubjectId,
    pub client_id: ClientId,
    pub scopes: ScopeSet,
    pub remember: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    Valid,
    Missing,
    Insufficient,
    SessionMismatch,
    Expired,
}

/// Longest remembered-consent lifetime accepted from configuration (100 years).
pub const MAX_CONSENT_LIFETIME_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Non-positive values mean the consent never expires.
pub fn consent_lifetime_from_secs(secs: i64) -> DomainResult<Option<Duration>> {
    if secs <= 0 {
        return Ok(None);
    }
    if secs > MAX_CONSENT_LIFETIME_SECS {
        return Err(DomainError::Validation(format!(
            "consent lifetime must be at most {MAX_CONSENT_LIFETIME_SECS} seconds"
        )));
    }
    Duration::try_seconds(secs)
        .map(Some)
        .ok_or_else(|| DomainError::Validation("consent lifetime out of range".into()))
}

impl ConsentRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Evaluate this record against a new request. A record that was not
    /// remembered only applies inside the session that created it.
    pub fn evaluate(
        &self,
        requested: &ScopeSet,
        session_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> ConsentStatus {
        if self.is_expired(now) {
            return ConsentStatus::Expired;
        }
        if !requested.is_subset(&self.scopes) {
            return ConsentStatus::Insufficient;
        }
        if self.remember {
            return ConsentStatus::Valid;
        }
        match (self.session_id.as_deref(), session_id) {
            (Some(recorded), Some(current)) if recorded == current => ConsentStatus::Valid,
            _ => ConsentStatus::SessionMismatch,
        }
    }
}
