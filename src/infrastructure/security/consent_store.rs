// src/infrastructure/security/consent_store.rs
use crate::domain::client::ClientId;
use crate::domain::consent::{ConsentRecord, ConsentStore, SubjectId};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use dashmap::DashMap;

/// Process-local consent storage. Upserts hold only the shard lock of the
/// affected pair, so writes for one (subject, client) are serialized while
/// unrelated pairs proceed in parallel.
#[derive(Default)]
pub struct InMemoryConsentStore {
    records: DashMap<(SubjectId, ClientId), ConsentRecord>,
}

impl InMemoryConsentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ConsentStore for InMemoryConsentStore {
    async fn find(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
    ) -> DomainResult<Option<ConsentRecord>> {
        let key = (subject_id.clone(), client_id.clone());
        Ok(self.records.get(&key).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, record: ConsentRecord) -> DomainResult<()> {
        let key = (record.subject_id.clone(), record.client_id.clone());
        self.records.insert(key, record);
        Ok(())
    }

    async fn remove(&self, subject_id: &SubjectId, client_id: &ClientId) -> DomainResult<bool> {
        let key = (subject_id.clone(), client_id.clone());
        Ok(self.records.remove(&key).is_some())
    }

    async fn remove_if_unchanged(&self, record: &ConsentRecord) -> DomainResult<bool> {
        let key = (record.subject_id.clone(), record.client_id.clone());
        Ok(self
            .records
            .remove_if(&key, |_, current| current == record)
            .is_some())
    }

    async fn list_for_subject(&self, subject_id: &SubjectId) -> DomainResult<Vec<ConsentRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| &entry.key().0 == subject_id)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ScopeSet;
    use chrono::Utc;

    fn record(subject: &str, client: &str) -> ConsentRecord {
        ConsentRecord {
            subject_id: SubjectId::new(subject).unwrap(),
            client_id: ClientId::new(client).unwrap(),
            scopes: ScopeSet::parse("openid").unwrap(),
            remember: true,
            session_id: None,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_replaces_and_list_filters_by_subject() {
        let store = InMemoryConsentStore::new();
        store.upsert(record("alice", "mvc")).await.unwrap();
        store.upsert(record("alice", "mvc")).await.unwrap();
        store.upsert(record("alice", "spa")).await.unwrap();
        store.upsert(record("bob", "mvc")).await.unwrap();

        assert_eq!(store.len(), 3);
        let alice = SubjectId::new("alice").unwrap();
        assert_eq!(store.list_for_subject(&alice).await.unwrap().len(), 2);
        assert!(store.remove(&alice, &ClientId::new("mvc").unwrap()).await.unwrap());
        assert!(!store.remove(&alice, &ClientId::new("mvc").unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn remove_if_unchanged_keeps_newer_record() {
        let store = InMemoryConsentStore::new();
        let stale = record("alice", "mvc");
        store.upsert(stale.clone()).await.unwrap();

        let mut fresh = stale.clone();
        fresh.created_at = stale.created_at + chrono::Duration::seconds(5);
        store.upsert(fresh.clone()).await.unwrap();

        assert!(!store.remove_if_unchanged(&stale).await.unwrap());
        let kept = store
            .find(&fresh.subject_id, &fresh.client_id)
            .await
            .unwrap();
        assert_eq!(kept, Some(fresh.clone()));
        assert!(store.remove_if_unchanged(&fresh).await.unwrap());
        assert!(store.is_empty());
    }
}
