// src/presentation/http/controllers/consent.rs
use crate::application::dto::{AuthorizationOutcomeDto, ConsentInput, ConsentRecordDto};
use crate::domain::{client::ClientId, consent::SubjectId};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConsentSubmission {
    /// Authenticated end user answering the prompt.
    pub subject_id: String,
    #[serde(flatten)]
    pub input: ConsentInput,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevokeConsentResponse {
    pub revoked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsentListResponse {
    pub items: Vec<ConsentRecordDto>,
}

#[utoipa::path(
    post,
    path = "/api/v1/consent",
    request_body = ConsentSubmission,
    responses(
        (status = 200, description = "Final state of the answered flow.", body = AuthorizationOutcomeDto),
        (status = 400, description = "Invalid consent input.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Flow belongs to another subject.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Unknown or already answered flow.", body = crate::presentation::http::error::ErrorResponse),
        (status = 410, description = "Consent prompt expired.", body = crate::presentation::http::error::ErrorResponse)
    ),
    tag = "Consent"
)]
pub async fn submit_consent(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<ConsentSubmission>,
) -> HttpResult<Json<AuthorizationOutcomeDto>> {
    let subject = parse_subject(payload.subject_id)?;
    let flow = state
        .services
        .authorization
        .respond_to_consent(&subject, payload.input)
        .await
        .into_http()?;
    Ok(Json(AuthorizationOutcomeDto::from_flow(&flow, None)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/consent/{subject_id}/{client_id}",
    params(
        ("subject_id" = String, Path, description = "End user"),
        ("client_id" = String, Path, description = "Client whose consent is revoked")
    ),
    responses(
        (status = 200, description = "Whether a record was removed.", body = RevokeConsentResponse)
    ),
    tag = "Consent"
)]
pub async fn revoke_consent(
    Extension(state): Extension<HttpState>,
    Path((subject_id, client_id)): Path<(String, String)>,
) -> HttpResult<Json<RevokeConsentResponse>> {
    let subject = parse_subject(subject_id)?;
    let client = ClientId::new(client_id).map_err(|err| HttpError::bad_request(err.to_string()))?;
    let revoked = state
        .services
        .authorization
        .revoke_consent(&subject, &client)
        .await
        .into_http()?;
    Ok(Json(RevokeConsentResponse { revoked }))
}

#[utoipa::path(
    get,
    path = "/api/v1/consent/{subject_id}",
    params(("subject_id" = String, Path, description = "End user")),
    responses(
        (status = 200, description = "Remembered consents of the subject.", body = ConsentListResponse)
    ),
    tag = "Consent"
)]
pub async fn list_consents(
    Extension(state): Extension<HttpState>,
    Path(subject_id): Path<String>,
) -> HttpResult<Json<ConsentListResponse>> {
    let subject = parse_subject(subject_id)?;
    let records = state
        .services
        .authorization
        .list_consents(&subject)
        .await
        .into_http()?;
    Ok(Json(ConsentListResponse {
        items: records.into_iter().map(ConsentRecordDto::from).collect(),
    }))
}

fn parse_subject(raw: String) -> HttpResult<SubjectId> {
    SubjectId::new(raw).map_err(|err| HttpError::bad_request(err.to_string()))
}
