// src/infrastructure/clients/file.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::client::GrantType;
use serde::Deserialize;
use std::path::Path;

/// Client definition as written in `CLIENTS_FILE`. Secrets are plaintext
/// here and are hashed during loading.
// No Debug: holds plaintext secrets.
#[derive(Clone, Deserialize)]
pub struct ClientFileEntry {
    pub client_id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    pub allowed_grant_types: Vec<GrantType>,
    #[serde(default)]
    pub allowed_scopes: Vec<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub post_logout_redirect_uris: Vec<String>,
    #[serde(default)]
    pub front_channel_logout_uri: Option<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub require_consent: bool,
    #[serde(default)]
    pub allow_offline_access: bool,
    #[serde(default)]
    pub consent_lifetime_seconds: Option<i64>,
}

pub fn parse_clients(json: &str) -> ApplicationResult<Vec<ClientFileEntry>> {
    serde_json::from_str(json)
        .map_err(|err| ApplicationError::validation(format!("invalid clients file: {err}")))
}

pub fn load_clients_file(path: &Path) -> ApplicationResult<Vec<ClientFileEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        ApplicationError::infrastructure(format!(
            "cannot read clients file {}: {err}",
            path.display()
        ))
    })?;
    parse_clients(&raw)
}
