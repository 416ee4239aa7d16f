// src/domain/errors.rs
use crate::domain::client::{ClientId, ScopeSet};
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Failures raised while deciding whether a client may obtain scopes.
///
/// `UnknownClient` and `InvalidSecret` carry no detail on purpose: both must
/// surface as the same external denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("unknown client")]
    UnknownClient,
    #[error("client '{0}' is already registered")]
    DuplicateClient(ClientId),
    #[error("grant type not allowed for client")]
    UnsupportedGrant,
    #[error("scopes not allowed for client: {0}")]
    ScopeNotAllowed(ScopeSet),
    #[error("invalid client secret")]
    InvalidSecret,
    #[error("redirect uri is not registered for client")]
    RedirectUriMismatch,
    #[error("consent prompt expired")]
    ConsentExpired,
}
