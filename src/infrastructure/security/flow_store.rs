// src/infrastructure/security/flow_store.rs
use crate::application::ApplicationResult;
use crate::application::ports::flows::PendingFlowStore;
use crate::domain::authorization::{AuthorizationFlow, FlowId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Default)]
pub struct InMemoryPendingFlowStore {
    // flow id -> parked flow
    inner: DashMap<FlowId, AuthorizationFlow>,
}

impl InMemoryPendingFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop flows nobody answered; returns how many were removed.
    pub fn purge_created_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.inner.retain(|_, flow| {
            let keep = flow.created_at >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

#[async_trait]
impl PendingFlowStore for InMemoryPendingFlowStore {
    async fn create_flow(&self, flow: AuthorizationFlow) -> ApplicationResult<()> {
        self.inner.insert(flow.id, flow);
        Ok(())
    }

    async fn get_flow(&self, id: &FlowId) -> ApplicationResult<Option<AuthorizationFlow>> {
        Ok(self.inner.get(id).map(|entry| entry.value().clone()))
    }

    async fn consume_flow(&self, id: &FlowId) -> ApplicationResult<Option<AuthorizationFlow>> {
        Ok(self.inner.remove(id).map(|(_, flow)| flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authorization::AuthorizationRequest;
    use crate::domain::client::{ClientId, GrantType, ScopeSet};
    use chrono::Duration;

    fn flow(created_at: DateTime<Utc>) -> AuthorizationFlow {
        let request = AuthorizationRequest::new(
            ClientId::new("mvc").unwrap(),
            GrantType::Hybrid,
            ScopeSet::parse("openid").unwrap(),
        );
        AuthorizationFlow::start(request, created_at)
    }

    #[tokio::test]
    async fn consume_returns_the_flow_only_once() {
        let store = InMemoryPendingFlowStore::new();
        let parked = flow(Utc::now());
        let id = parked.id;
        store.create_flow(parked).await.unwrap();

        assert!(store.get_flow(&id).await.unwrap().is_some());
        assert!(store.consume_flow(&id).await.unwrap().is_some());
        assert!(store.consume_flow(&id).await.unwrap().is_none());
        assert!(store.get_flow(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn purge_drops_only_stale_flows() {
        let store = InMemoryPendingFlowStore::new();
        let now = Utc::now();
        store.create_flow(flow(now - Duration::minutes(30))).await.unwrap();
        store.create_flow(flow(now)).await.unwrap();

        assert_eq!(store.purge_created_before(now - Duration::minutes(10)), 1);
        assert_eq!(store.len(), 1);
    }
}
