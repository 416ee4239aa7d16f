// src/domain/authorization/mod.rs
pub mod authorizer;
pub mod flow;
pub mod request;

pub use authorizer::{authorize, requires_consent};
pub use flow::{AuthorizationFlow, FlowId, FlowState};
pub use request::{AuthorizationDecision, AuthorizationRequest, DenialReason};
