// src/domain/client/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("client id cannot be empty".into()));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::Validation(
                "client id cannot contain whitespace".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OAuth2 / OIDC flow a client may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Implicit,
    Hybrid,
    ClientCredentials,
    AuthorizationCode,
    HybridAndClientCredentials,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::Implicit => "implicit",
            GrantType::Hybrid => "hybrid",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::HybridAndClientCredentials => "hybrid_and_client_credentials",
        }
    }

    /// Whether a client allowed to use `self` may run a `requested` flow.
    pub fn permits(&self, requested: GrantType) -> bool {
        match self {
            GrantType::HybridAndClientCredentials => matches!(
                requested,
                GrantType::Hybrid
                    | GrantType::ClientCredentials
                    | GrantType::HybridAndClientCredentials
            ),
            other => *other == requested,
        }
    }

    pub fn involves_end_user(&self) -> bool {
        !matches!(self, GrantType::ClientCredentials)
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "implicit" => Ok(GrantType::Implicit),
            "hybrid" => Ok(GrantType::Hybrid),
            "client_credentials" => Ok(GrantType::ClientCredentials),
            "authorization_code" => Ok(GrantType::AuthorizationCode),
            "hybrid_and_client_credentials" => Ok(GrantType::HybridAndClientCredentials),
            other => Err(DomainError::Validation(format!(
                "unknown grant type '{other}'"
            ))),
        }
    }
}

/// Ordered set of exact-match scope names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ScopeSet(BTreeSet<String>);

impl ScopeSet {
    pub fn new<I, S>(scopes: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for scope in scopes {
            let scope = scope.into();
            validate_scope(&scope)?;
            set.insert(scope);
        }
        Ok(Self(set))
    }

    /// Parse a space-delimited `scope` parameter.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        Self::new(raw.split_whitespace())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    pub fn is_subset(&self, other: &ScopeSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Scopes in `self` that are missing from `other`.
    pub fn difference(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn intersection(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn union(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn with(mut self, scope: &str) -> ScopeSet {
        self.0.insert(scope.to_string());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn validate_scope(scope: &str) -> DomainResult<()> {
    if scope.is_empty() {
        return Err(DomainError::Validation("scope cannot be empty".into()));
    }
    if scope.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return Err(DomainError::Validation(format!(
            "scope '{scope}' contains invalid characters"
        )));
    }
    Ok(())
}

impl TryFrom<Vec<String>> for ScopeSet {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScopeSet> for Vec<String> {
    fn from(value: ScopeSet) -> Self {
        value.0.into_iter().collect()
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.0.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
        f.write_str(&joined)
    }
}

/// Absolute redirect target, compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedirectUri(String);

impl RedirectUri {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let parsed = Url::parse(&value).map_err(|err| {
            DomainError::Validation(format!("redirect uri '{value}' is not absolute: {err}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(DomainError::Validation(format!(
                "redirect uri '{value}' is not a hierarchical url"
            )));
        }
        if parsed.fragment().is_some() {
            return Err(DomainError::Validation(format!(
                "redirect uri '{value}' must not contain a fragment"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RedirectUri {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RedirectUri> for String {
    fn from(value: RedirectUri) -> Self {
        value.0
    }
}

impl fmt::Display for RedirectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of the configured one-way secret hash.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("secret hash cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash([redacted])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecret {
    pub hash: SecretHash,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ClientSecret {
    pub fn new(hash: SecretHash) -> Self {
        Self {
            hash,
            description: None,
            expires_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|exp| exp > now)
    }
}
