// src/domain/client/registry.rs
use crate::domain::client::{ClientDefinition, ClientId, repository::ClientStore};
use crate::domain::errors::{AuthorizationError, DomainResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Client definitions loaded at startup. Populate with `register`, then
/// share behind an `Arc`; reads take no locks.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, Arc<ClientDefinition>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: ClientDefinition) -> Result<(), AuthorizationError> {
        if self.clients.contains_key(&definition.id) {
            return Err(AuthorizationError::DuplicateClient(definition.id));
        }
        tracing::info!(
            client_id = %definition.id,
            public = definition.is_public(),
            "registered client"
        );
        self.clients
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn lookup(&self, id: &ClientId) -> Option<Arc<ClientDefinition>> {
        self.clients.get(id).map(Arc::clone)
    }

    /// Never reveals whether the client exists: unknown client and
    /// unregistered URI are both `false`.
    pub fn validate_redirect_uri(&self, id: &ClientId, uri: &str) -> bool {
        self.clients
            .get(id)
            .is_some_and(|c| c.redirect_uris.iter().any(|r| r.as_str() == uri))
    }

    pub fn validate_post_logout_redirect_uri(&self, id: &ClientId, uri: &str) -> bool {
        self.clients.get(id).is_some_and(|c| {
            c.post_logout_redirect_uris
                .iter()
                .any(|r| r.as_str() == uri)
        })
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ClientId> {
        self.clients.keys()
    }
}

#[async_trait]
impl ClientStore for ClientRegistry {
    async fn find_by_id(&self, id: &ClientId) -> DomainResult<Option<Arc<ClientDefinition>>> {
        Ok(self.lookup(id))
    }

    async fn is_redirect_uri_registered(&self, id: &ClientId, uri: &str) -> bool {
        self.validate_redirect_uri(id, uri)
    }

    async fn is_post_logout_redirect_uri_registered(&self, id: &ClientId, uri: &str) -> bool {
        self.validate_post_logout_redirect_uri(id, uri)
    }
}
