// src/domain/authorization/flow.rs
use crate::domain::authorization::request::{
    AuthorizationDecision, AuthorizationRequest, DenialReason,
};
use crate::domain::client::ScopeSet;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(Uuid);

impl FlowId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| DomainError::Validation("malformed flow id".into()))
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// `Requested -> AwaitingConsent | Granted | Denied`,
/// `AwaitingConsent -> Granted | Denied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Requested,
    AwaitingConsent { scopes: ScopeSet },
    Granted { scopes: ScopeSet },
    Denied { reason: DenialReason },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Requested => "requested",
            FlowState::AwaitingConsent { .. } => "awaiting_consent",
            FlowState::Granted { .. } => "granted",
            FlowState::Denied { .. } => "denied",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Granted { .. } | FlowState::Denied { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    pub id: FlowId,
    pub request: AuthorizationRequest,
    pub state: FlowState,
    pub created_at: DateTime<Utc>,
}

impl AuthorizationFlow {
    pub fn start(request: AuthorizationRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: FlowId::generate(),
            request: request.without_secret(),
            state: FlowState::Requested,
            created_at: now,
        }
    }

    /// Move out of `Requested` according to the first decision.
    pub fn apply(&mut self, decision: AuthorizationDecision) -> DomainResult<()> {
        if self.state != FlowState::Requested {
            return Err(self.invalid_transition("decision"));
        }
        self.state = match decision {
            AuthorizationDecision::Granted { scopes } => FlowState::Granted { scopes },
            AuthorizationDecision::Denied { reason } => FlowState::Denied { reason },
            AuthorizationDecision::ConsentRequired { scopes } => {
                FlowState::AwaitingConsent { scopes }
            }
        };
        Ok(())
    }

    pub fn grant(&mut self, scopes: ScopeSet) -> DomainResult<()> {
        self.ensure_awaiting("grant")?;
        self.state = FlowState::Granted { scopes };
        Ok(())
    }

    pub fn deny(&mut self, reason: DenialReason) -> DomainResult<()> {
        self.ensure_awaiting("deny")?;
        self.state = FlowState::Denied { reason };
        Ok(())
    }

    pub fn pending_scopes(&self) -> Option<&ScopeSet> {
        match &self.state {
            FlowState::AwaitingConsent { scopes } => Some(scopes),
            _ => None,
        }
    }

    /// Decision view of the current state; `None` while still `Requested`.
    pub fn decision(&self) -> Option<AuthorizationDecision> {
        match &self.state {
            FlowState::Requested => None,
            FlowState::AwaitingConsent { scopes } => {
                Some(AuthorizationDecision::consent_required(scopes.clone()))
            }
            FlowState::Granted { scopes } => Some(AuthorizationDecision::granted(scopes.clone())),
            FlowState::Denied { reason } => Some(AuthorizationDecision::denied(reason.clone())),
        }
    }

    fn ensure_awaiting(&self, action: &str) -> DomainResult<()> {
        if matches!(self.state, FlowState::AwaitingConsent { .. }) {
            Ok(())
        } else {
            Err(self.invalid_transition(action))
        }
    }

    fn invalid_transition(&self, action: &str) -> DomainError {
        DomainError::Validation(format!(
            "cannot {action} flow {} in state {}",
            self.id,
            self.state.name()
        ))
    }
}
