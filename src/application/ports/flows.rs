// src/application/ports/flows.rs
use crate::application::ApplicationResult;
use crate::domain::authorization::{AuthorizationFlow, FlowId};
use async_trait::async_trait;

/// Authorization flows parked while the end user looks at the consent page.
#[async_trait]
pub trait PendingFlowStore: Send + Sync {
    async fn create_flow(&self, flow: AuthorizationFlow) -> ApplicationResult<()>;
    async fn get_flow(&self, id: &FlowId) -> ApplicationResult<Option<AuthorizationFlow>>;
    /// Consume (atomically remove) the flow and return it if still present.
    async fn consume_flow(&self, id: &FlowId) -> ApplicationResult<Option<AuthorizationFlow>>;
}
