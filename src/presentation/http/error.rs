// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::{
    authorization::DenialReason,
    errors::{AuthorizationError, DomainError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth-style error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Authorization(err) => Self::from_authorization(err),
            ApplicationError::Validation(msg)
            | ApplicationError::Domain(DomainError::Validation(msg)) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_request", msg)
            }
            ApplicationError::NotFound(msg) | ApplicationError::Domain(DomainError::NotFound(msg)) => {
                Self::new(StatusCode::NOT_FOUND, "not_found", msg)
            }
            ApplicationError::Conflict(msg) | ApplicationError::Domain(DomainError::Conflict(msg)) => {
                Self::new(StatusCode::CONFLICT, "conflict", msg)
            }
            ApplicationError::Unauthorized(msg) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_client", msg)
            }
            ApplicationError::Forbidden(msg) => {
                Self::new(StatusCode::FORBIDDEN, "access_denied", msg)
            }
            ApplicationError::Infrastructure(msg)
            | ApplicationError::Domain(DomainError::Persistence(msg)) => {
                tracing::error!(error = %msg, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "internal server error".into(),
                )
            }
        }
    }

    /// Unknown clients and bad secrets share one response.
    fn from_authorization(err: AuthorizationError) -> Self {
        let status = match &err {
            AuthorizationError::UnknownClient | AuthorizationError::InvalidSecret => {
                StatusCode::UNAUTHORIZED
            }
            AuthorizationError::DuplicateClient(_) => StatusCode::CONFLICT,
            AuthorizationError::ConsentExpired => StatusCode::GONE,
            AuthorizationError::UnsupportedGrant
            | AuthorizationError::ScopeNotAllowed(_)
            | AuthorizationError::RedirectUriMismatch => StatusCode::BAD_REQUEST,
        };
        let reason = DenialReason::from(err);
        let message = match &reason {
            DenialReason::InvalidClient => "client authentication failed".to_string(),
            DenialReason::UnauthorizedClient => {
                "client is not allowed to use this grant type".to_string()
            }
            DenialReason::InvalidScope(scopes) => format!("scopes not allowed: {scopes}"),
            DenialReason::InvalidRedirectUri => "redirect uri is not registered".to_string(),
            DenialReason::ConsentExpired => "the consent prompt expired".to_string(),
            DenialReason::InvalidRequest(msg) => msg.clone(),
            DenialReason::AccessDenied | DenialReason::ServerError => reason.error_code().to_string(),
        };
        Self::new(status, reason.error_code(), message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message.into())
    }

    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.code.to_string(),
            error_description: self.message,
        };
        (self.status, Json(payload)).into_response()
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_client_and_bad_secret_look_identical() {
        let unknown = HttpError::from_error(AuthorizationError::UnknownClient.into());
        let bad_secret = HttpError::from_error(AuthorizationError::InvalidSecret.into());
        assert_eq!(unknown.status, bad_secret.status);
        assert_eq!(unknown.code, bad_secret.code);
        assert_eq!(unknown.message, bad_secret.message);
        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn infrastructure_details_are_not_leaked() {
        let err = HttpError::from_error(ApplicationError::infrastructure("redis down at 10.0.0.3"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("10.0.0.3"));
    }

    #[test]
    fn expired_consent_maps_to_gone() {
        let err = HttpError::from_error(AuthorizationError::ConsentExpired.into());
        assert_eq!(err.status, StatusCode::GONE);
        assert_eq!(err.code, "access_denied");
    }
}
