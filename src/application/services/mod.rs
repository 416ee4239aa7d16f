// src/application/services/mod.rs
pub mod consent_tracker;
pub mod secret_verifier;

use std::sync::Arc;

use crate::{
    application::{
        commands::authorization::{AuthorizationService, AuthorizationSettings},
        ports::{flows::PendingFlowStore, security::SecretHasher, time::Clock},
    },
    domain::{
        client::{ClientStore, ResourceCatalog},
        consent::ConsentStore,
    },
};

pub use consent_tracker::ConsentTracker;
pub use secret_verifier::SecretVerifier;

/// Services shared by the HTTP handlers, wired once at startup.
pub struct ApplicationServices {
    pub authorization: Arc<AuthorizationService>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client_store: Arc<dyn ClientStore>,
        consent_store: Arc<dyn ConsentStore>,
        flow_store: Arc<dyn PendingFlowStore>,
        secret_hasher: Arc<dyn SecretHasher>,
        hash_timeout: std::time::Duration,
        resources: Arc<ResourceCatalog>,
        clock: Arc<dyn Clock>,
        settings: AuthorizationSettings,
    ) -> Self {
        let secret_verifier = Arc::new(SecretVerifier::new(secret_hasher, hash_timeout));
        let consent_tracker = Arc::new(ConsentTracker::new(consent_store, Arc::clone(&clock)));

        let authorization = Arc::new(AuthorizationService::new(
            client_store,
            secret_verifier,
            consent_tracker,
            flow_store,
            resources,
            clock,
            settings,
        ));

        Self { authorization }
    }
}
