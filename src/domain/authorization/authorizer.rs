// src/domain/authorization/authorizer.rs
use crate::domain::authorization::request::AuthorizationDecision;
use crate::domain::client::{ClientDefinition, GrantType, ScopeSet};
use crate::domain::errors::AuthorizationError;

/// Whether a request under `grant` must go through the consent screen.
pub fn requires_consent(client: &ClientDefinition, grant: GrantType) -> bool {
    client.require_consent && grant.involves_end_user()
}

/// Decide whether `client` may obtain `requested` using `grant`.
///
/// `has_consent` reports whether an existing consent record already covers
/// every requested scope; it is only consulted for end-user grants.
pub fn authorize(
    client: &ClientDefinition,
    grant: GrantType,
    requested: &ScopeSet,
    has_consent: bool,
) -> Result<AuthorizationDecision, AuthorizationError> {
    if !client.allows_grant(grant) {
        return Err(AuthorizationError::UnsupportedGrant);
    }

    let unknown = requested.difference(&client.effective_scopes());
    if !unknown.is_empty() {
        return Err(AuthorizationError::ScopeNotAllowed(unknown));
    }

    if requires_consent(client, grant) && !has_consent {
        return Ok(AuthorizationDecision::consent_required(requested.clone()));
    }

    Ok(AuthorizationDecision::granted(requested.clone()))
}
