// src/infrastructure/clients/mod.rs
pub mod catalog;
pub mod file;

pub use catalog::{ApiClientSettings, CatalogSettings, MVC_CLIENT_ID, build_registry};
pub use file::{ClientFileEntry, load_clients_file, parse_clients};
