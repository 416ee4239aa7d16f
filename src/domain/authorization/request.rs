// src/domain/authorization/request.rs
use crate::domain::client::{ClientId, GrantType, ScopeSet};
use crate::domain::consent::SubjectId;
use crate::domain::errors::AuthorizationError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub client_id: ClientId,
    pub grant_type: GrantType,
    pub scopes: ScopeSet,
    /// Absent for client-credentials.
    pub subject_id: Option<SubjectId>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub session_id: Option<String>,
}

impl AuthorizationRequest {
    pub fn new(client_id: ClientId, grant_type: GrantType, scopes: ScopeSet) -> Self {
        Self {
            client_id,
            grant_type,
            scopes,
            subject_id: None,
            client_secret: None,
            redirect_uri: None,
            session_id: None,
        }
    }

    pub fn for_subject(mut self, subject_id: SubjectId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Copy suitable for keeping around while the user is prompted.
    pub fn without_secret(&self) -> Self {
        Self {
            client_secret: None,
            ..self.clone()
        }
    }
}

impl fmt::Debug for AuthorizationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationRequest")
            .field("client_id", &self.client_id)
            .field("grant_type", &self.grant_type)
            .field("scopes", &self.scopes)
            .field("subject_id", &self.subject_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .field("session_id", &self.session_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum DenialReason {
    /// Unknown client or bad credentials; deliberately one variant.
    InvalidClient,
    UnauthorizedClient,
    InvalidScope(ScopeSet),
    InvalidRedirectUri,
    AccessDenied,
    ConsentExpired,
    InvalidRequest(String),
    ServerError,
}

impl DenialReason {
    /// OAuth2 error code for the protocol response.
    pub fn error_code(&self) -> &'static str {
        match self {
            DenialReason::InvalidClient => "invalid_client",
            DenialReason::UnauthorizedClient => "unauthorized_client",
            DenialReason::InvalidScope(_) => "invalid_scope",
            DenialReason::InvalidRedirectUri | DenialReason::InvalidRequest(_) => {
                "invalid_request"
            }
            DenialReason::AccessDenied | DenialReason::ConsentExpired => "access_denied",
            DenialReason::ServerError => "server_error",
        }
    }
}

impl From<AuthorizationError> for DenialReason {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::UnknownClient | AuthorizationError::InvalidSecret => {
                DenialReason::InvalidClient
            }
            AuthorizationError::UnsupportedGrant => DenialReason::UnauthorizedClient,
            AuthorizationError::ScopeNotAllowed(scopes) => DenialReason::InvalidScope(scopes),
            AuthorizationError::RedirectUriMismatch => DenialReason::InvalidRedirectUri,
            AuthorizationError::ConsentExpired => DenialReason::ConsentExpired,
            AuthorizationError::DuplicateClient(_) => {
                DenialReason::InvalidRequest("client configuration conflict".into())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthorizationDecision {
    Granted { scopes: ScopeSet },
    Denied { reason: DenialReason },
    ConsentRequired { scopes: ScopeSet },
}

impl AuthorizationDecision {
    pub fn granted(scopes: ScopeSet) -> Self {
        Self::Granted { scopes }
    }

    pub fn denied(reason: DenialReason) -> Self {
        Self::Denied { reason }
    }

    pub fn consent_required(scopes: ScopeSet) -> Self {
        Self::ConsentRequired { scopes }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}
