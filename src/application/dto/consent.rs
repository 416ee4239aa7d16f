// src/application/dto/consent.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::client::ScopeSet;
use crate::domain::consent::ConsentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the consent page posts back.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsentInput {
    /// `yes` or `no`.
    pub button: String,
    #[serde(default, alias = "scopesConsented")]
    pub scopes_consented: Vec<String>,
    #[serde(default, alias = "rememberConsent")]
    pub remember_consent: bool,
    #[serde(alias = "returnUrl")]
    pub return_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentChoice {
    Approve { scopes: ScopeSet, remember: bool },
    Deny,
}

impl ConsentInput {
    pub fn choice(&self) -> ApplicationResult<ConsentChoice> {
        match self.button.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(ConsentChoice::Approve {
                scopes: ScopeSet::new(self.scopes_consented.iter().cloned())?,
                remember: self.remember_consent,
            }),
            "no" => Ok(ConsentChoice::Deny),
            other => Err(ApplicationError::validation(format!(
                "unknown consent button '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsentRecordDto {
    pub client_id: String,
    pub scopes: Vec<String>,
    pub remember: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ConsentRecord> for ConsentRecordDto {
    fn from(record: ConsentRecord) -> Self {
        Self {
            client_id: record.client_id.into(),
            scopes: record.scopes.into(),
            remember: record.remember,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}
