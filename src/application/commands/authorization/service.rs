use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    ports::{flows::PendingFlowStore, time::Clock},
    services::{consent_tracker::ConsentTracker, secret_verifier::SecretVerifier},
};
use crate::domain::client::{ClientStore, ResourceCatalog};

pub const CALLBACK_PATH: &str = "/connect/authorize/callback";

#[derive(Debug, Clone)]
pub struct AuthorizationSettings {
    /// Public base URL of this server, used to build consent return URLs.
    pub issuer: String,
    pub consent_prompt_ttl: Duration,
    /// Applied to remembered consent when the client sets no lifetime.
    pub default_consent_lifetime: Option<chrono::Duration>,
}

impl AuthorizationSettings {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into().trim_end_matches('/').to_string(),
            consent_prompt_ttl: Duration::from_secs(600),
            default_consent_lifetime: None,
        }
    }

    pub fn callback_url(&self) -> String {
        format!("{}{CALLBACK_PATH}", self.issuer)
    }
}

pub struct AuthorizationService {
    pub(super) clients: Arc<dyn ClientStore>,
    pub(super) secrets: Arc<SecretVerifier>,
    pub(super) consents: Arc<ConsentTracker>,
    pub(super) flows: Arc<dyn PendingFlowStore>,
    pub(super) resources: Arc<ResourceCatalog>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) settings: AuthorizationSettings,
}

impl AuthorizationService {
    pub fn new(
        clients: Arc<dyn ClientStore>,
        secrets: Arc<SecretVerifier>,
        consents: Arc<ConsentTracker>,
        flows: Arc<dyn PendingFlowStore>,
        resources: Arc<ResourceCatalog>,
        clock: Arc<dyn Clock>,
        settings: AuthorizationSettings,
    ) -> Self {
        Self {
            clients,
            secrets,
            consents,
            flows,
            resources,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &AuthorizationSettings {
        &self.settings
    }
}
