// src/presentation/http/controllers/authorize.rs
use crate::application::dto::{AuthorizationOutcomeDto, AuthorizationRequestDto};
use crate::domain::authorization::AuthorizationRequest;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};

/// Decide an authorization request.
///
/// End-user grants that need consent are parked and answered later through
/// `POST /api/v1/consent` with the returned `return_url`. Denials are part of
/// the 200 response body, not HTTP errors.
#[utoipa::path(
    post,
    path = "/api/v1/authorize/decide",
    request_body = AuthorizationRequestDto,
    responses(
        (status = 200, description = "Authorization decision.", body = AuthorizationOutcomeDto),
        (status = 400, description = "Malformed request.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Authorization"
)]
pub async fn decide(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<AuthorizationRequestDto>,
) -> HttpResult<Json<AuthorizationOutcomeDto>> {
    let request = AuthorizationRequest::try_from(payload)
        .map_err(|err| HttpError::bad_request(err.to_string()))?;
    let service = &state.services.authorization;

    if request.grant_type.involves_end_user() {
        let flow = service.begin(request).await.into_http()?;
        let return_url = service.return_url(&flow);
        Ok(Json(AuthorizationOutcomeDto::from_flow(&flow, return_url)))
    } else {
        let decision = service.evaluate(&request).await;
        Ok(Json(AuthorizationOutcomeDto::from_decision(&decision)))
    }
}
