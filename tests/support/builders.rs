// tests/support/builders.rs
use clientgate::domain::client::{
    ClientDefinition, ClientId, ClientSecret, GrantType, RedirectUri, ScopeSet, SecretHash,
};
use clientgate::domain::consent::SubjectId;

pub const MVC_REDIRECT: &str = "https://mvc.example.com/signin-oidc";
pub const MVC_POST_LOGOUT: &str = "https://mvc.example.com/signout-callback-oidc";
pub const SERVICE_SECRET: &str = "service-secret";

pub fn scopes(raw: &str) -> ScopeSet {
    ScopeSet::parse(raw).unwrap()
}

pub fn subject(raw: &str) -> SubjectId {
    SubjectId::new(raw).unwrap()
}

pub fn client_id(raw: &str) -> ClientId {
    ClientId::new(raw).unwrap()
}

/// Digest [`super::PlainHasher`] produces for `secret`.
pub fn plain_hash(secret: &str) -> SecretHash {
    SecretHash::new(format!("plain:{secret}")).unwrap()
}

/// Interactive hybrid client that asks for consent.
pub fn mvc_client() -> ClientDefinition {
    ClientDefinition::new(client_id("mvc"), "MVC Client")
        .with_grant_type(GrantType::Hybrid)
        .with_scopes(scopes("openid profile api1"))
        .with_redirect_uri(RedirectUri::new(MVC_REDIRECT).unwrap())
        .with_post_logout_redirect_uri(RedirectUri::new(MVC_POST_LOGOUT).unwrap())
        .with_require_consent(true)
}

/// Machine client: client credentials only, scope `api1`.
pub fn service_client() -> ClientDefinition {
    ClientDefinition::new(client_id("service"), "Service")
        .with_grant_type(GrantType::ClientCredentials)
        .with_scopes(scopes("api1"))
        .with_secret(ClientSecret::new(plain_hash(SERVICE_SECRET)))
}
