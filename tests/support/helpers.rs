// tests/support/helpers.rs
use super::builders::{mvc_client, service_client};
use super::mocks::{CountingHasher, FixedClock};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
use clientgate::application::commands::authorization::AuthorizationSettings;
use clientgate::application::ports::security::SecretHasher;
use clientgate::application::services::ApplicationServices;
use clientgate::domain::client::{ClientDefinition, ClientRegistry, ResourceCatalog};
use clientgate::infrastructure::security::{
    consent_store::InMemoryConsentStore, flow_store::InMemoryPendingFlowStore,
};
use clientgate::presentation::http::{routes::build_router, state::HttpState};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

pub const ISSUER: &str = "https://id.example.com";
pub const HASH_TIMEOUT: Duration = Duration::from_millis(500);

/// Services wired to in-memory stores plus handles to poke at them.
pub struct Harness {
    pub services: Arc<ApplicationServices>,
    pub clock: Arc<FixedClock>,
    pub consents: Arc<InMemoryConsentStore>,
    pub flows: Arc<InMemoryPendingFlowStore>,
    pub hasher: Arc<CountingHasher>,
}

impl Harness {
    pub fn router(&self) -> axum::Router {
        let state = HttpState {
            services: Arc::clone(&self.services),
        };
        build_router(state, &["http://localhost:3000".to_string()])
    }
}

pub fn default_settings() -> AuthorizationSettings {
    AuthorizationSettings::new(ISSUER)
}

/// `mvc` (hybrid, consent) and `service` (client credentials).
pub fn harness() -> Harness {
    harness_with(vec![mvc_client(), service_client()], default_settings())
}

pub fn harness_with(clients: Vec<ClientDefinition>, settings: AuthorizationSettings) -> Harness {
    let hasher = Arc::new(CountingHasher::default());
    let mut harness = build_harness(clients, settings, hasher.clone());
    harness.hasher = hasher;
    harness
}

/// Default clients verified through `provider`; `Harness::hasher` is unused.
pub fn harness_with_hasher(provider: Arc<dyn SecretHasher>) -> Harness {
    build_harness(
        vec![mvc_client(), service_client()],
        default_settings(),
        provider,
    )
}

fn build_harness(
    clients: Vec<ClientDefinition>,
    settings: AuthorizationSettings,
    provider: Arc<dyn SecretHasher>,
) -> Harness {
    let mut registry = ClientRegistry::new();
    for client in clients {
        registry.register(client).expect("duplicate client in test setup");
    }

    let clock = Arc::new(FixedClock::new());
    let consents = Arc::new(InMemoryConsentStore::new());
    let flows = Arc::new(InMemoryPendingFlowStore::new());

    let services = Arc::new(ApplicationServices::new(
        Arc::new(registry),
        consents.clone(),
        flows.clone(),
        provider,
        HASH_TIMEOUT,
        Arc::new(ResourceCatalog::standard()),
        clock.clone(),
        settings,
    ));

    Harness {
        services,
        clock,
        consents,
        flows,
        hasher: Arc::new(CountingHasher::default()),
    }
}

pub fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

pub async fn json_body(resp: axum::response::Response) -> Value {
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let ct = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    serde_json::from_slice(&body_bytes).expect("expected valid json body")
}

/// Assert an `ErrorResponse` with the expected status and OAuth error code.
pub async fn assert_error_response(
    resp: axum::response::Response,
    expected_status: StatusCode,
    expected_error: &str,
) -> Value {
    assert_eq!(resp.status(), expected_status);
    let json = json_body(resp).await;
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let msg_field = json
        .get("error_description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {err_field}");
    assert!(!msg_field.is_empty(), "expected non-empty error_description");
    json
}
