// src/domain/client/mod.rs
pub mod entity;
pub mod registry;
pub mod repository;
pub mod resources;
pub mod value_objects;

pub use entity::{ClientDefinition, OFFLINE_ACCESS_SCOPE};
pub use registry::ClientRegistry;
pub use repository::ClientStore;
pub use resources::{Resource, ResourceCatalog, ResourceKind};
pub use value_objects::{ClientId, ClientSecret, GrantType, RedirectUri, ScopeSet, SecretHash};
