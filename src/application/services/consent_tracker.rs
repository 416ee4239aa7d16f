// src/application/services/consent_tracker.rs
use crate::application::{ApplicationResult, error::ApplicationError, ports::time::Clock};
use crate::domain::client::{ClientId, ScopeSet};
use crate::domain::consent::{ConsentRecord, ConsentStatus, ConsentStore, SubjectId};
use chrono::Duration;
use std::sync::Arc;

/// Records and answers end-user consent decisions on top of a
/// [`ConsentStore`]. Writes for one (subject, client) pair are serialized by
/// the store's upsert.
pub struct ConsentTracker {
    store: Arc<dyn ConsentStore>,
    clock: Arc<dyn Clock>,
}

impl ConsentTracker {
    pub fn new(store: Arc<dyn ConsentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create or replace the consent for the pair. Partial consent is
    /// expressed by passing only the approved subset.
    pub async fn record_consent(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
        scopes: ScopeSet,
        remember: bool,
        session_id: Option<&str>,
        lifetime: Option<Duration>,
    ) -> ApplicationResult<ConsentRecord> {
        let now = self.clock.now();
        let expires_at = match lifetime.filter(|_| remember) {
            Some(ttl) => Some(now.checked_add_signed(ttl).ok_or_else(|| {
                ApplicationError::validation("consent lifetime out of range")
            })?),
            None => None,
        };
        let record = ConsentRecord {
            subject_id: subject_id.clone(),
            client_id: client_id.clone(),
            scopes,
            remember,
            session_id: session_id.map(str::to_string),
            created_at: now,
            expires_at,
        };

        self.store.upsert(record.clone()).await?;
        tracing::info!(
            subject_id = %subject_id,
            client_id = %client_id,
            scopes = %record.scopes,
            remember,
            "consent recorded"
        );
        Ok(record)
    }

    pub async fn check(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
        requested: &ScopeSet,
        session_id: Option<&str>,
    ) -> ApplicationResult<ConsentStatus> {
        let Some(record) = self.store.find(subject_id, client_id).await? else {
            return Ok(ConsentStatus::Missing);
        };

        let status = record.evaluate(requested, session_id, self.clock.now());
        if status == ConsentStatus::Expired && self.store.remove_if_unchanged(&record).await? {
            tracing::debug!(
                subject_id = %subject_id,
                client_id = %client_id,
                "evicted expired consent"
            );
        }
        Ok(status)
    }

    pub async fn has_valid_consent(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
        requested: &ScopeSet,
        session_id: Option<&str>,
    ) -> ApplicationResult<bool> {
        let status = self
            .check(subject_id, client_id, requested, session_id)
            .await?;
        Ok(status == ConsentStatus::Valid)
    }

    pub async fn revoke(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
    ) -> ApplicationResult<bool> {
        let removed = self.store.remove(subject_id, client_id).await?;
        if removed {
            tracing::info!(subject_id = %subject_id, client_id = %client_id, "consent revoked");
        }
        Ok(removed)
    }

    /// Remembered, unexpired consents of a subject, ordered by client id.
    pub async fn list_remembered(
        &self,
        subject_id: &SubjectId,
    ) -> ApplicationResult<Vec<ConsentRecord>> {
        let now = self.clock.now();
        let mut records: Vec<ConsentRecord> = self
            .store
            .list_for_subject(subject_id)
            .await?
            .into_iter()
            .filter(|r| r.remember && !r.is_expired(now))
            .collect();
        records.sort_by(|a, b| a.client_id.cmp(&b.client_id));
        Ok(records)
    }
}
