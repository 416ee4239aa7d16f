use super::{AuthorizationService, CALLBACK_PATH};
use crate::{
    application::{
        dto::{ConsentChoice, ConsentInput},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        authorization::{AuthorizationFlow, DenialReason, FlowId},
        client::{ClientId, ScopeSet},
        consent::{ConsentRecord, SubjectId},
        errors::AuthorizationError,
    },
};

impl AuthorizationService {
    /// Return URL the consent page posts back with; `None` unless the flow
    /// is awaiting consent.
    pub fn return_url(&self, flow: &AuthorizationFlow) -> Option<String> {
        flow.pending_scopes()?;
        let query = serde_urlencoded::to_string([("flow", flow.id.to_string())]).ok()?;
        Some(format!("{}?{query}", self.settings.callback_url()))
    }

    /// Answer a parked flow: `AwaitingConsent -> Granted | Denied`.
    pub async fn respond_to_consent(
        &self,
        subject_id: &SubjectId,
        input: ConsentInput,
    ) -> ApplicationResult<AuthorizationFlow> {
        let flow_id = self.parse_return_url(&input.return_url)?;
        let choice = input.choice()?;

        let mut flow = self
            .flows
            .get_flow(&flow_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("consent request"))?;

        if flow.request.subject_id.as_ref() != Some(subject_id) {
            return Err(ApplicationError::forbidden(
                "consent request belongs to another subject",
            ));
        }

        let ttl = chrono::Duration::from_std(self.settings.consent_prompt_ttl)
            .unwrap_or(chrono::Duration::MAX);
        if self.clock.now() - flow.created_at > ttl {
            self.flows.consume_flow(&flow_id).await?;
            tracing::info!(flow_id = %flow_id, "consent prompt expired");
            return Err(AuthorizationError::ConsentExpired.into());
        }

        let requested = flow
            .pending_scopes()
            .cloned()
            .ok_or_else(|| ApplicationError::conflict("flow is not awaiting consent"))?;
        let approved = match &choice {
            ConsentChoice::Approve { scopes, .. } => {
                Some(self.approved_scopes(scopes, &requested)?)
            }
            ConsentChoice::Deny => None,
        };

        // whoever consumes the flow first answers it
        self.flows
            .consume_flow(&flow_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("consent request"))?;

        match (approved, choice) {
            (Some(scopes), ConsentChoice::Approve { remember, .. }) => {
                let client = self.find_client(&flow.request.client_id).await?;
                let lifetime = client
                    .consent_lifetime
                    .or(self.settings.default_consent_lifetime);
                self.consents
                    .record_consent(
                        subject_id,
                        &client.id,
                        scopes.clone(),
                        remember,
                        flow.request.session_id.as_deref(),
                        lifetime,
                    )
                    .await?;
                flow.grant(scopes)?;
            }
            _ => {
                tracing::info!(flow_id = %flow_id, "user denied consent");
                flow.deny(DenialReason::AccessDenied)?;
            }
        }
        Ok(flow)
    }

    /// Record consent directly, outside a parked flow.
    pub async fn record_consent(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
        scopes: ScopeSet,
        remember: bool,
        session_id: Option<&str>,
    ) -> ApplicationResult<ConsentRecord> {
        let client = self.find_client(client_id).await?;
        let lifetime = client
            .consent_lifetime
            .or(self.settings.default_consent_lifetime);
        self.consents
            .record_consent(subject_id, client_id, scopes, remember, session_id, lifetime)
            .await
    }

    pub async fn has_valid_consent(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
        requested: &ScopeSet,
        session_id: Option<&str>,
    ) -> ApplicationResult<bool> {
        self.consents
            .has_valid_consent(subject_id, client_id, requested, session_id)
            .await
    }

    pub async fn revoke_consent(
        &self,
        subject_id: &SubjectId,
        client_id: &ClientId,
    ) -> ApplicationResult<bool> {
        self.consents.revoke(subject_id, client_id).await
    }

    pub async fn list_consents(
        &self,
        subject_id: &SubjectId,
    ) -> ApplicationResult<Vec<ConsentRecord>> {
        self.consents.list_remembered(subject_id).await
    }

    /// Consented scopes must be a non-empty subset of the request; required
    /// resources that were requested are always kept.
    fn approved_scopes(
        &self,
        consented: &ScopeSet,
        requested: &ScopeSet,
    ) -> ApplicationResult<ScopeSet> {
        if consented.is_empty() {
            return Err(ApplicationError::validation(
                "you must pick at least one permission",
            ));
        }
        let extra = consented.difference(requested);
        if !extra.is_empty() {
            return Err(ApplicationError::validation(format!(
                "scopes were not part of the request: {extra}"
            )));
        }
        Ok(consented.union(&self.resources.required_within(requested)))
    }

    fn parse_return_url(&self, return_url: &str) -> ApplicationResult<FlowId> {
        let invalid = || ApplicationError::validation("invalid return url");

        let (base, query) = return_url.split_once('?').ok_or_else(invalid)?;
        let is_ours = base == self.settings.callback_url() || base == CALLBACK_PATH;
        if !is_ours {
            return Err(invalid());
        }

        let params: Vec<(String, String)> =
            serde_urlencoded::from_str(query).map_err(|_| invalid())?;
        let raw = params
            .into_iter()
            .find_map(|(k, v)| (k == "flow").then_some(v))
            .ok_or_else(invalid)?;
        Ok(FlowId::parse(&raw)?)
    }
}
