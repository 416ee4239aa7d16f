// src/domain/consent/repository.rs
use crate::domain::client::ClientId;
use crate::domain::consent::entity::{ConsentRecord, SubjectId};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait ConsentStore: Send + Sync {
    async fn find(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
    ) -> DomainResult<Option<ConsentRecord>>;

    /// Create or atomically replace the record for the record's pair.
    async fn upsert(&self, record: ConsentRecord) -> DomainResult<()>;

    /// Returns whether a record was removed.
    async fn remove(&self, subject_id: &SubjectId, client_id: &ClientId) -> DomainResult<bool>;

    /// Remove the pair's record only if it still equals `record`. A newer
    /// upsert for the pair is left in place.
    async fn remove_if_unchanged(&self, record: &ConsentRecord) -> DomainResult<bool>;

    async fn list_for_subject(&self, subject_id: &SubjectId) -> DomainResult<Vec<ConsentRecord>>;
}
