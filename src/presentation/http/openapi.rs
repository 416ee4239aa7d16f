// src/presentation/http/openapi.rs
use axum::{Router, response::Redirect, routing::get};
use serde::{Deserialize, Serialize};
use std::{env, fs::File, io::BufWriter, path::Path};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::authorize::decide,
        crate::presentation::http::controllers::consent::submit_consent,
        crate::presentation::http::controllers::consent::revoke_consent,
        crate::presentation::http::controllers::consent::list_consents,
        crate::presentation::http::controllers::clients::validate_redirect,
        crate::presentation::http::controllers::clients::validate_post_logout_redirect,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::consent::ConsentSubmission,
            crate::presentation::http::controllers::consent::RevokeConsentResponse,
            crate::presentation::http::controllers::consent::ConsentListResponse,
            crate::presentation::http::controllers::clients::RedirectCheckRequest,
            crate::presentation::http::controllers::clients::RedirectCheckResponse,
            crate::application::dto::AuthorizationRequestDto,
            crate::application::dto::AuthorizationOutcomeDto,
            crate::application::dto::ConsentInput,
            crate::application::dto::ConsentRecordDto,
            crate::domain::client::GrantType
        )
    ),
    tags(
        (name = "Authorization", description = "Grant, scope and consent decisions"),
        (name = "Consent", description = "End-user consent records"),
        (name = "Clients", description = "Redirect target validation"),
        (name = "System", description = "System level endpoints")
    ),
    info(
        title = "Clientgate API",
        description = "Client registry and authorization decisions for an OpenID Connect provider",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    let swagger = SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi());
    Router::new()
        .merge(swagger)
        .route("/", get(|| async { Redirect::permanent("/docs") }))
}

pub fn write_openapi_snapshot() -> std::io::Result<()> {
    let doc = ApiDoc::openapi();
    let output_path =
        env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| "spec/openapi.json".to_string());
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}
