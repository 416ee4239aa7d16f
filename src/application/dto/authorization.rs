// src/application/dto/authorization.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::authorization::{
    AuthorizationDecision, AuthorizationFlow, AuthorizationRequest, DenialReason,
};
use crate::domain::client::{ClientId, GrantType, ScopeSet};
use crate::domain::consent::SubjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Parameters forwarded by the authorization / token endpoint.
// No Debug: carries the raw client secret.
#[derive(Deserialize, ToSchema)]
pub struct AuthorizationRequestDto {
    pub client_id: String,
    pub grant_type: GrantType,
    /// Space-delimited scope list.
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl TryFrom<AuthorizationRequestDto> for AuthorizationRequest {
    type Error = ApplicationError;

    fn try_from(dto: AuthorizationRequestDto) -> ApplicationResult<Self> {
        let mut request = AuthorizationRequest::new(
            ClientId::new(dto.client_id)?,
            dto.grant_type,
            ScopeSet::parse(&dto.scope)?,
        );
        if let Some(subject) = dto.subject_id {
            request = request.for_subject(SubjectId::new(subject)?);
        }
        if let Some(secret) = dto.client_secret {
            request = request.with_secret(secret);
        }
        if let Some(uri) = dto.redirect_uri {
            request = request.with_redirect_uri(uri);
        }
        if let Some(session) = dto.session_id {
            request = request.in_session(session);
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizationOutcomeDto {
    /// `granted`, `denied` or `consent_required`.
    pub outcome: String,
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

impl AuthorizationOutcomeDto {
    pub fn from_decision(decision: &AuthorizationDecision) -> Self {
        match decision {
            AuthorizationDecision::Granted { scopes } => Self::new("granted", scopes),
            AuthorizationDecision::ConsentRequired { scopes } => {
                Self::new("consent_required", scopes)
            }
            AuthorizationDecision::Denied { reason } => Self {
                error: Some(reason.error_code().to_string()),
                error_description: Some(describe(reason)),
                ..Self::new("denied", &ScopeSet::empty())
            },
        }
    }

    /// Flow view; `return_url` is only set while the flow awaits consent.
    pub fn from_flow(flow: &AuthorizationFlow, return_url: Option<String>) -> Self {
        let decision = flow
            .decision()
            .unwrap_or_else(|| AuthorizationDecision::denied(DenialReason::ServerError));
        Self {
            flow_id: Some(flow.id.to_string()),
            return_url,
            ..Self::from_decision(&decision)
        }
    }

    fn new(outcome: &str, scopes: &ScopeSet) -> Self {
        Self {
            outcome: outcome.to_string(),
            scopes: scopes.iter().map(str::to_string).collect(),
            error: None,
            error_description: None,
            flow_id: None,
            return_url: None,
        }
    }
}

fn describe(reason: &DenialReason) -> String {
    match reason {
        DenialReason::InvalidClient => "client authentication failed".into(),
        DenialReason::UnauthorizedClient => {
            "client is not allowed to use this grant type".into()
        }
        DenialReason::InvalidScope(scopes) => format!("scopes not allowed: {scopes}"),
        DenialReason::InvalidRedirectUri => "redirect uri is not registered".into(),
        DenialReason::AccessDenied => "the user denied the request".into(),
        DenialReason::ConsentExpired => "the consent prompt expired".into(),
        DenialReason::InvalidRequest(msg) => msg.clone(),
        DenialReason::ServerError => "authorization temporarily unavailable".into(),
    }
}
