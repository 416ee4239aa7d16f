// src/infrastructure/clients/catalog.rs
use crate::application::{ApplicationResult, ports::security::SecretHasher};
use crate::domain::client::{
    ClientDefinition, ClientId, ClientRegistry, ClientSecret, GrantType, RedirectUri,
    ResourceCatalog, ScopeSet,
};
use crate::domain::consent::consent_lifetime_from_secs;
use crate::infrastructure::clients::file::ClientFileEntry;
use std::fmt;

pub const MVC_CLIENT_ID: &str = "client";

/// Configuration values the static client list is built from.
#[derive(Clone, Default)]
pub struct CatalogSettings {
    /// Base URL of the relying web application.
    pub domain_name: String,
    pub mvc_client_secret: Option<String>,
    pub api_client: Option<ApiClientSettings>,
    pub extra_clients: Vec<ClientFileEntry>,
}

#[derive(Clone)]
pub struct ApiClientSettings {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("domain_name", &self.domain_name)
            .field("mvc_client_secret", &self.mvc_client_secret.as_ref().map(|_| "[redacted]"))
            .field("api_client", &self.api_client.as_ref().map(|c| &c.client_id))
            .field("extra_clients", &self.extra_clients.len())
            .finish()
    }
}

/// Build and freeze the registry. Every plaintext secret is hashed here and
/// dropped; only digests reach the definitions.
pub async fn build_registry(
    settings: &CatalogSettings,
    hasher: &dyn SecretHasher,
    resources: &ResourceCatalog,
) -> ApplicationResult<ClientRegistry> {
    let mut definitions = vec![mvc_client(settings, hasher).await?];
    if let Some(api) = &settings.api_client {
        definitions.push(api_client(api, hasher).await?);
    }
    for entry in &settings.extra_clients {
        definitions.push(from_file_entry(entry, hasher).await?);
    }

    let mut registry = ClientRegistry::new();
    for definition in definitions {
        resources.validate_client(&definition)?;
        registry.register(definition)?;
    }
    let mut ids: Vec<&str> = registry.ids().map(ClientId::as_str).collect();
    ids.sort_unstable();
    tracing::info!(
        clients = registry.len(),
        client_ids = %ids.join(","),
        algorithm = hasher.algorithm(),
        "client registry loaded"
    );
    Ok(registry)
}

async fn mvc_client(
    settings: &CatalogSettings,
    hasher: &dyn SecretHasher,
) -> ApplicationResult<ClientDefinition> {
    let base = settings.domain_name.trim_end_matches('/');
    let mut client = ClientDefinition::new(ClientId::new(MVC_CLIENT_ID)?, "MVC Client")
        .with_grant_type(GrantType::Implicit)
        .with_require_consent(false)
        .with_redirect_uri(RedirectUri::new(format!("{base}/signin-oidc"))?)
        .with_post_logout_redirect_uri(RedirectUri::new(format!("{base}/signout-callback-oidc"))?)
        .with_scopes(ScopeSet::parse("openid profile api1")?)
        .with_offline_access(true);

    if let Some(secret) = &settings.mvc_client_secret {
        client = client.with_secret(ClientSecret::new(hasher.hash(secret).await?));
    }
    Ok(client)
}

async fn api_client(
    api: &ApiClientSettings,
    hasher: &dyn SecretHasher,
) -> ApplicationResult<ClientDefinition> {
    Ok(ClientDefinition::new(ClientId::new(api.client_id.clone())?, "API Client")
        .with_grant_type(GrantType::ClientCredentials)
        .with_secret(ClientSecret::new(hasher.hash(&api.client_secret).await?))
        .with_scopes(ScopeSet::parse("api1")?))
}

async fn from_file_entry(
    entry: &ClientFileEntry,
    hasher: &dyn SecretHasher,
) -> ApplicationResult<ClientDefinition> {
    let id = ClientId::new(entry.client_id.clone())?;
    let name = entry
        .client_name
        .clone()
        .unwrap_or_else(|| entry.client_id.clone());

    let mut client = ClientDefinition::new(id, name)
        .with_scopes(ScopeSet::new(entry.allowed_scopes.iter().cloned())?)
        .with_require_consent(entry.require_consent)
        .with_offline_access(entry.allow_offline_access);

    for grant in &entry.allowed_grant_types {
        client = client.with_grant_type(*grant);
    }
    for uri in &entry.redirect_uris {
        client = client.with_redirect_uri(RedirectUri::new(uri.clone())?);
    }
    for uri in &entry.post_logout_redirect_uris {
        client = client.with_post_logout_redirect_uri(RedirectUri::new(uri.clone())?);
    }
    if let Some(uri) = &entry.front_channel_logout_uri {
        client = client.with_front_channel_logout_uri(RedirectUri::new(uri.clone())?);
    }
    for secret in &entry.secrets {
        client = client.with_secret(ClientSecret::new(hasher.hash(secret).await?));
    }
    if let Some(lifetime) = entry
        .consent_lifetime_seconds
        .map(consent_lifetime_from_secs)
        .transpose()?
        .flatten()
    {
        client = client.with_consent_lifetime(lifetime);
    }
    Ok(client)
}
