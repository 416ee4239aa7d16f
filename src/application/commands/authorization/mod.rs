mod consent;
mod decide;
mod redirect;
mod service;

pub use service::{AuthorizationService, AuthorizationSettings, CALLBACK_PATH};
