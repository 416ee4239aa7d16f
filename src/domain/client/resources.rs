// src/domain/client/resources.rs
use crate::domain::client::entity::{ClientDefinition, OFFLINE_ACCESS_SCOPE};
use crate::domain::client::value_objects::ScopeSet;
use crate::domain::errors::{DomainError, DomainResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Identity,
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub display_name: String,
    pub kind: ResourceKind,
    /// Required resources cannot be deselected on the consent screen.
    pub required: bool,
}

/// Scopes this server knows how to issue.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    resources: BTreeMap<String, Resource>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `openid` (required), `profile`, `email` and the `api1` API.
    pub fn standard() -> Self {
        Self::new()
            .with_identity("openid", "Your user identifier", true)
            .with_identity("profile", "User profile", false)
            .with_identity("email", "Your email address", false)
            .with_api("api1", "My API")
    }

    pub fn with_identity(mut self, name: &str, display_name: &str, required: bool) -> Self {
        self.resources.insert(
            name.to_string(),
            Resource {
                name: name.to_string(),
                display_name: display_name.to_string(),
                kind: ResourceKind::Identity,
                required,
            },
        );
        self
    }

    pub fn with_api(mut self, name: &str, display_name: &str) -> Self {
        self.resources.insert(
            name.to_string(),
            Resource {
                name: name.to_string(),
                display_name: display_name.to_string(),
                kind: ResourceKind::Api,
                required: false,
            },
        );
        self
    }

    pub fn get(&self, scope: &str) -> Option<&Resource> {
        self.resources.get(scope)
    }

    pub fn contains(&self, scope: &str) -> bool {
        scope == OFFLINE_ACCESS_SCOPE || self.resources.contains_key(scope)
    }

    /// Subset of `scopes` that must be kept on the consent screen.
    pub fn required_within(&self, scopes: &ScopeSet) -> ScopeSet {
        let required = scopes
            .iter()
            .filter(|s| self.resources.get(*s).is_some_and(|r| r.required))
            .map(str::to_string)
            .collect::<Vec<_>>();
        ScopeSet::new(required).unwrap_or_default()
    }

    pub fn validate_client(&self, client: &ClientDefinition) -> DomainResult<()> {
        let unknown = client
            .allowed_scopes
            .iter()
            .filter(|s| !self.contains(s))
            .collect::<Vec<_>>();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "client '{}' references unknown scopes: {}",
                client.id,
                unknown.join(" ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::value_objects::ClientId;

    #[test]
    fn standard_catalog_marks_openid_required() {
        let catalog = ResourceCatalog::standard();
        let scopes = ScopeSet::parse("openid profile api1").unwrap();
        assert_eq!(catalog.required_within(&scopes), ScopeSet::parse("openid").unwrap());
        assert_eq!(catalog.get("api1").map(|r| r.kind), Some(ResourceKind::Api));
    }

    #[test]
    fn validate_client_names_unknown_scopes() {
        let client = ClientDefinition::new(ClientId::new("c").unwrap(), "c")
            .with_scopes(ScopeSet::parse("openid api9").unwrap());
        let err = ResourceCatalog::standard().validate_client(&client).unwrap_err();
        assert!(err.to_string().contains("api9"));
    }
}
