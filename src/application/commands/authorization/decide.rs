use super::AuthorizationService;
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::{
        authorization::{
            AuthorizationDecision, AuthorizationFlow, AuthorizationRequest, DenialReason,
            authorize, requires_consent,
        },
        client::{ClientDefinition, GrantType},
        consent::ConsentStatus,
        errors::{AuthorizationError, DomainError},
    },
};
use std::sync::Arc;

impl AuthorizationService {
    /// Can `request.client_id`, using `request.grant_type`, obtain
    /// `request.scopes` for `request.subject_id`?
    pub async fn decide(
        &self,
        request: &AuthorizationRequest,
    ) -> ApplicationResult<AuthorizationDecision> {
        let client = self.find_client_or_burn(request).await?;

        ensure_subject_matches_grant(request)?;
        self.ensure_redirect_uri(&client, request)?;
        self.authenticate_client(&client, request).await?;

        let has_consent = self.has_covering_consent(&client, request).await?;
        let decision = authorize(&client, request.grant_type, &request.scopes, has_consent)?;

        tracing::debug!(
            client_id = %client.id,
            grant_type = %request.grant_type,
            scopes = %request.scopes,
            ?decision,
            "authorization decided"
        );
        Ok(decision)
    }

    /// Like [`decide`](Self::decide) but never fails: every error becomes a
    /// `Denied` decision. Unknown clients and bad secrets produce the same
    /// reason.
    pub async fn evaluate(&self, request: &AuthorizationRequest) -> AuthorizationDecision {
        match self.decide(request).await {
            Ok(decision) => decision,
            Err(err) => AuthorizationDecision::denied(denial_for(err)),
        }
    }

    /// Start an end-user flow. When consent is needed the flow is parked
    /// until the consent page answers it.
    pub async fn begin(
        &self,
        request: AuthorizationRequest,
    ) -> ApplicationResult<AuthorizationFlow> {
        let decision = self.evaluate(&request).await;
        let mut flow = AuthorizationFlow::start(request, self.clock.now());
        flow.apply(decision)?;

        if flow.pending_scopes().is_some() {
            self.flows.create_flow(flow.clone()).await?;
            tracing::info!(
                flow_id = %flow.id,
                client_id = %flow.request.client_id,
                "awaiting consent"
            );
        }
        Ok(flow)
    }

    pub(super) async fn find_client(
        &self,
        id: &crate::domain::client::ClientId,
    ) -> ApplicationResult<Arc<ClientDefinition>> {
        self.clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthorizationError::UnknownClient.into())
    }

    async fn find_client_or_burn(
        &self,
        request: &AuthorizationRequest,
    ) -> ApplicationResult<Arc<ClientDefinition>> {
        match self.clients.find_by_id(&request.client_id).await? {
            Some(client) => Ok(client),
            None => {
                // keep unknown clients as slow as a failed secret check
                if let Some(secret) = &request.client_secret {
                    self.secrets.verify(secret, &[], self.clock.now()).await;
                }
                tracing::warn!(client_id = %request.client_id, "authorization for unknown client");
                Err(AuthorizationError::UnknownClient.into())
            }
        }
    }

    fn ensure_redirect_uri(
        &self,
        client: &ClientDefinition,
        request: &AuthorizationRequest,
    ) -> ApplicationResult<()> {
        match &request.redirect_uri {
            Some(uri) if !client.redirect_uris.iter().any(|r| r.as_str() == uri) => {
                tracing::warn!(client_id = %client.id, "redirect uri mismatch");
                Err(AuthorizationError::RedirectUriMismatch.into())
            }
            _ => Ok(()),
        }
    }

    /// Client-credentials always needs a secret; other grants are checked
    /// whenever one is presented.
    async fn authenticate_client(
        &self,
        client: &ClientDefinition,
        request: &AuthorizationRequest,
    ) -> ApplicationResult<()> {
        let needs_secret = request.grant_type == GrantType::ClientCredentials;
        let presented = match (&request.client_secret, needs_secret) {
            (Some(secret), _) => secret.as_str(),
            (None, true) => {
                tracing::warn!(client_id = %client.id, "client credentials without secret");
                return Err(AuthorizationError::InvalidSecret.into());
            }
            (None, false) => return Ok(()),
        };

        if self
            .secrets
            .verify(presented, &client.secrets, self.clock.now())
            .await
        {
            Ok(())
        } else {
            tracing::warn!(client_id = %client.id, "client secret verification failed");
            Err(AuthorizationError::InvalidSecret.into())
        }
    }

    async fn has_covering_consent(
        &self,
        client: &ClientDefinition,
        request: &AuthorizationRequest,
    ) -> ApplicationResult<bool> {
        if !requires_consent(client, request.grant_type) {
            return Ok(false);
        }
        let Some(subject) = &request.subject_id else {
            return Ok(false);
        };

        let status = self
            .consents
            .check(
                subject,
                &client.id,
                &request.scopes,
                request.session_id.as_deref(),
            )
            .await?;
        if status == ConsentStatus::Expired {
            tracing::debug!(
                client_id = %client.id,
                subject_id = %subject,
                "stored consent expired"
            );
        }
        Ok(status == ConsentStatus::Valid)
    }
}

fn ensure_subject_matches_grant(request: &AuthorizationRequest) -> ApplicationResult<()> {
    match (request.grant_type.involves_end_user(), &request.subject_id) {
        (true, None) => Err(ApplicationError::validation(
            "interactive grants require a subject",
        )),
        (false, Some(_)) => Err(ApplicationError::validation(
            "client_credentials requests cannot carry a subject",
        )),
        _ => Ok(()),
    }
}

fn denial_for(err: ApplicationError) -> DenialReason {
    match err {
        ApplicationError::Authorization(err) => DenialReason::from(err),
        ApplicationError::Validation(msg) | ApplicationError::Domain(DomainError::Validation(msg)) => {
            DenialReason::InvalidRequest(msg)
        }
        other => {
            tracing::error!(error = %other, "authorization failed");
            DenialReason::ServerError
        }
    }
}
