// src/presentation/http/controllers/clients.rs
use crate::domain::client::ClientId;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RedirectCheckRequest {
    pub client_id: String,
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedirectCheckResponse {
    pub valid: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/clients/redirect/validate",
    request_body = RedirectCheckRequest,
    responses((status = 200, description = "Whether the redirect uri is registered.", body = RedirectCheckResponse)),
    tag = "Clients"
)]
pub async fn validate_redirect(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RedirectCheckRequest>,
) -> Json<RedirectCheckResponse> {
    let valid = match ClientId::new(payload.client_id) {
        Ok(id) => {
            state
                .services
                .authorization
                .validate_client_redirect(&id, &payload.uri)
                .await
        }
        Err(_) => false,
    };
    Json(RedirectCheckResponse { valid })
}

#[utoipa::path(
    post,
    path = "/api/v1/clients/post-logout-redirect/validate",
    request_body = RedirectCheckRequest,
    responses((status = 200, description = "Whether the post-logout redirect uri is registered.", body = RedirectCheckResponse)),
    tag = "Clients"
)]
pub async fn validate_post_logout_redirect(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RedirectCheckRequest>,
) -> Json<RedirectCheckResponse> {
    let valid = match ClientId::new(payload.client_id) {
        Ok(id) => {
            state
                .services
                .authorization
                .validate_post_logout_redirect(&id, &payload.uri)
                .await
        }
        Err(_) => false,
    };
    Json(RedirectCheckResponse { valid })
}
