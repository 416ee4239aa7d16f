// src/domain/client/repository.rs
use crate::domain::client::{ClientDefinition, ClientId};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn find_by_id(&self, id: &ClientId) -> DomainResult<Option<Arc<ClientDefinition>>>;

    /// Exact match against the registered redirect URIs. Unknown clients
    /// and lookup failures both yield `false`.
    async fn is_redirect_uri_registered(&self, id: &ClientId, uri: &str) -> bool {
        matches!(
            self.find_by_id(id).await,
            Ok(Some(client)) if client.redirect_uris.iter().any(|r| r.as_str() == uri)
        )
    }

    async fn is_post_logout_redirect_uri_registered(&self, id: &ClientId, uri: &str) -> bool {
        matches!(
            self.find_by_id(id).await,
            Ok(Some(client)) if client.post_logout_redirect_uris.iter().any(|r| r.as_str() == uri)
        )
    }
}
