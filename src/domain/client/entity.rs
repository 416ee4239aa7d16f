// src/domain/client/entity.rs
use crate::domain::client::value_objects::{
    ClientId, ClientSecret, GrantType, RedirectUri, ScopeSet,
};
use chrono::Duration;
use std::collections::HashSet;

pub const OFFLINE_ACCESS_SCOPE: &str = "offline_access";

/// Static definition of a relying party. Frozen once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDefinition {
    pub id: ClientId,
    pub name: String,
    pub allowed_grant_types: HashSet<GrantType>,
    pub allowed_scopes: ScopeSet,
    pub redirect_uris: HashSet<RedirectUri>,
    pub post_logout_redirect_uris: HashSet<RedirectUri>,
    pub front_channel_logout_uri: Option<RedirectUri>,
    pub secrets: Vec<ClientSecret>,
    pub require_consent: bool,
    pub allow_offline_access: bool,
    pub consent_lifetime: Option<Duration>,
}

impl ClientDefinition {
    pub fn new(id: ClientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            allowed_grant_types: HashSet::new(),
            allowed_scopes: ScopeSet::empty(),
            redirect_uris: HashSet::new(),
            post_logout_redirect_uris: HashSet::new(),
            front_channel_logout_uri: None,
            secrets: Vec::new(),
            require_consent: false,
            allow_offline_access: false,
            consent_lifetime: None,
        }
    }

    pub fn with_grant_type(mut self, grant: GrantType) -> Self {
        self.allowed_grant_types.insert(grant);
        self
    }

    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.allowed_scopes = self.allowed_scopes.union(&scopes);
        self
    }

    pub fn with_redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.redirect_uris.insert(uri);
        self
    }

    pub fn with_post_logout_redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.post_logout_redirect_uris.insert(uri);
        self
    }

    pub fn with_front_channel_logout_uri(mut self, uri: RedirectUri) -> Self {
        self.front_channel_logout_uri = Some(uri);
        self
    }

    pub fn with_secret(mut self, secret: ClientSecret) -> Self {
        self.secrets.push(secret);
        self
    }

    pub fn with_require_consent(mut self, require_consent: bool) -> Self {
        self.require_consent = require_consent;
        self
    }

    pub fn with_offline_access(mut self, allow: bool) -> Self {
        self.allow_offline_access = allow;
        self
    }

    pub fn with_consent_lifetime(mut self, lifetime: Duration) -> Self {
        self.consent_lifetime = Some(lifetime);
        self
    }

    pub fn is_public(&self) -> bool {
        self.secrets.is_empty()
    }

    pub fn allows_grant(&self, requested: GrantType) -> bool {
        self.allowed_grant_types
            .iter()
            .any(|allowed| allowed.permits(requested))
    }

    /// Allowed scopes plus `offline_access` when refresh tokens are enabled.
    pub fn effective_scopes(&self) -> ScopeSet {
        if self.allow_offline_access {
            self.allowed_scopes.clone().with(OFFLINE_ACCESS_SCOPE)
        } else {
            self.allowed_scopes.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mvc() -> ClientDefinition {
        ClientDefinition::new(ClientId::new("mvc").unwrap(), "MVC Client")
            .with_grant_type(GrantType::Hybrid)
            .with_scopes(ScopeSet::parse("openid profile api1").unwrap())
    }

    #[test]
    fn offline_access_is_added_only_when_enabled() {
        let client = mvc();
        assert!(!client.effective_scopes().contains(OFFLINE_ACCESS_SCOPE));
        let client = client.with_offline_access(true);
        assert!(client.effective_scopes().contains(OFFLINE_ACCESS_SCOPE));
        assert!(!client.allowed_scopes.contains(OFFLINE_ACCESS_SCOPE));
    }

    #[test]
    fn client_without_secrets_is_public() {
        assert!(mvc().is_public());
    }

    #[test]
    fn allows_grant_expands_combined_grant() {
        let client = ClientDefinition::new(ClientId::new("svc").unwrap(), "svc")
            .with_grant_type(GrantType::HybridAndClientCredentials);
        assert!(client.allows_grant(GrantType::ClientCredentials));
        assert!(client.allows_grant(GrantType::Hybrid));
        assert!(!client.allows_grant(GrantType::Implicit));
    }
}
