// src/config.rs
use crate::domain::consent::{MAX_CONSENT_LIFETIME_SECS, consent_lifetime_from_secs};
use crate::infrastructure::{
    clients::{ApiClientSettings, CatalogSettings, ClientFileEntry},
    security::secret_hasher::HashAlgorithm,
};
use std::{env, fmt, path::PathBuf, time::Duration};
use thiserror::Error;

/// Frozen runtime configuration, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    listen_addr: String,
    issuer_url: String,
    domain_name: String,
    mvc_client_secret: Option<String>,
    api_client: Option<ApiClientSettings>,
    clients_file: Option<PathBuf>,
    hash_algorithm: HashAlgorithm,
    hash_timeout: Duration,
    consent_prompt_ttl: Duration,
    consent_lifetime: Option<chrono::Duration>,
    redis_url: Option<String>,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:5000".into()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

const DEFAULT_HASH_TIMEOUT_MS: u64 = 500;
const DEFAULT_CONSENT_PROMPT_TTL_SECS: u64 = 600;
const MAX_CONSENT_PROMPT_TTL_SECS: u64 = 24 * 60 * 60;

impl AppConfig {
    /// Build configuration from environment variables. Optional values fall
    /// back to defaults; malformed values are rejected rather than ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(default_listen_addr);
        let issuer_url = get("ISSUER_URL").unwrap_or_else(|| format!("http://{listen_addr}"));
        url::Url::parse(&issuer_url).map_err(|err| {
            ConfigError::Invalid(format!("ISSUER_URL must be an absolute url: {err}"))
        })?;
        let domain_name = get("DOMAIN_NAME").ok_or(ConfigError::Missing("DOMAIN_NAME"))?;
        url::Url::parse(&domain_name).map_err(|err| {
            ConfigError::Invalid(format!("DOMAIN_NAME must be an absolute url: {err}"))
        })?;

        let api_client = match (get("API_CLIENT_ID"), get("API_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(ApiClientSettings {
                client_id,
                client_secret,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("API_CLIENT_SECRET")),
            (None, Some(_)) => return Err(ConfigError::Missing("API_CLIENT_ID")),
        };

        let hash_algorithm = match get("SECRET_HASH_ALGORITHM")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("sha256") => HashAlgorithm::Sha256,
            Some("blake3") => HashAlgorithm::Blake3,
            Some("hmac-sha256") => HashAlgorithm::HmacSha256 {
                pepper: get("SECRET_HASH_PEPPER")
                    .ok_or(ConfigError::Missing("SECRET_HASH_PEPPER"))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported SECRET_HASH_ALGORITHM '{other}'"
                )));
            }
        };

        let hash_timeout_ms =
            parse_u64(get("SECRET_HASH_TIMEOUT_MS"), "SECRET_HASH_TIMEOUT_MS")?
                .unwrap_or(DEFAULT_HASH_TIMEOUT_MS);
        if hash_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "SECRET_HASH_TIMEOUT_MS must be positive".into(),
            ));
        }
        let prompt_ttl_secs = parse_u64(
            get("CONSENT_PROMPT_TTL_SECONDS"),
            "CONSENT_PROMPT_TTL_SECONDS",
        )?
        .unwrap_or(DEFAULT_CONSENT_PROMPT_TTL_SECS);
        if prompt_ttl_secs > MAX_CONSENT_PROMPT_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "CONSENT_PROMPT_TTL_SECONDS must be at most {MAX_CONSENT_PROMPT_TTL_SECS}"
            )));
        }
        let consent_lifetime =
            match parse_u64(get("CONSENT_LIFETIME_SECONDS"), "CONSENT_LIFETIME_SECONDS")? {
                None => None,
                Some(secs) => i64::try_from(secs)
                    .ok()
                    .and_then(|secs| consent_lifetime_from_secs(secs).ok())
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!(
                            "CONSENT_LIFETIME_SECONDS must be at most {MAX_CONSENT_LIFETIME_SECS}"
                        ))
                    })?,
            };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_allowed_origins);

        Ok(Self {
            listen_addr,
            issuer_url,
            domain_name,
            mvc_client_secret: get("MVC_CLIENT_SECRET"),
            api_client,
            clients_file: get("CLIENTS_FILE").map(PathBuf::from),
            hash_algorithm,
            hash_timeout: Duration::from_millis(hash_timeout_ms),
            consent_prompt_ttl: Duration::from_secs(prompt_ttl_secs),
            consent_lifetime,
            redis_url: get("REDIS_URL"),
            allowed_origins,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Public base URL of this server; consent return URLs hang off it.
    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn clients_file(&self) -> Option<&PathBuf> {
        self.clients_file.as_ref()
    }

    pub fn hash_algorithm(&self) -> &HashAlgorithm {
        &self.hash_algorithm
    }

    pub fn hash_timeout(&self) -> Duration {
        self.hash_timeout
    }

    pub fn consent_prompt_ttl(&self) -> Duration {
        self.consent_prompt_ttl
    }

    /// `None` means remembered consent never expires.
    pub fn consent_lifetime(&self) -> Option<chrono::Duration> {
        self.consent_lifetime
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Settings for the static client catalog. `extra_clients` comes from the
    /// already-parsed `CLIENTS_FILE`.
    pub fn catalog_settings(&self, extra_clients: Vec<ClientFileEntry>) -> CatalogSettings {
        CatalogSettings {
            domain_name: self.domain_name.clone(),
            mvc_client_secret: self.mvc_client_secret.clone(),
            api_client: self.api_client.clone(),
            extra_clients,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("listen_addr", &self.listen_addr)
            .field("issuer_url", &self.issuer_url)
            .field("domain_name", &self.domain_name)
            .field("mvc_client_secret", &self.mvc_client_secret.as_ref().map(|_| "[redacted]"))
            .field("api_client", &self.api_client.as_ref().map(|c| &c.client_id))
            .field("clients_file", &self.clients_file)
            .field("hash_algorithm", &self.hash_algorithm.name())
            .field("hash_timeout", &self.hash_timeout)
            .field("consent_prompt_ttl", &self.consent_prompt_ttl)
            .field("consent_lifetime", &self.consent_lifetime)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[redacted]"))
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

fn parse_u64(value: Option<String>, key: &str) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid(format!("{key} must be a non-negative integer")))
        })
        .transpose()
}
