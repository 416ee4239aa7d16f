use super::AuthorizationService;
use crate::domain::client::ClientId;

impl AuthorizationService {
    /// Must be called before issuing any redirect response. `false` means
    /// deny; it does not tell whether the client exists.
    pub async fn validate_client_redirect(&self, client_id: &ClientId, uri: &str) -> bool {
        self.clients.is_redirect_uri_registered(client_id, uri).await
    }

    pub async fn validate_post_logout_redirect(&self, client_id: &ClientId, uri: &str) -> bool {
        self.clients
            .is_post_logout_redirect_uri_registered(client_id, uri)
            .await
    }
}
