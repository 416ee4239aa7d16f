// tests/e2e_http.rs
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::util::ServiceExt as _;

mod support;

use support::{
    ISSUER, MVC_POST_LOGOUT, MVC_REDIRECT, SERVICE_SECRET, assert_error_response, harness,
    json_body, post_json,
};

#[tokio::test]
async fn health_returns_ok() {
    let app = harness().router();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "status": "ok" }));

    let direct = clientgate::presentation::http::routes::health().await;
    assert_eq!(direct.0.status, "ok");
}

#[tokio::test]
async fn client_credentials_decision_is_granted() {
    let app = harness().router();
    let req = post_json(
        "/api/v1/authorize/decide",
        &json!({
            "client_id": "service",
            "grant_type": "client_credentials",
            "scope": "api1",
            "client_secret": SERVICE_SECRET
        }),
    );

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["outcome"], "granted");
    assert_eq!(body["scopes"], json!(["api1"]));
    assert!(body.get("flow_id").is_none());
}

#[tokio::test]
async fn unknown_client_and_bad_secret_get_the_same_denial() {
    let app = harness().router();
    let unknown = post_json(
        "/api/v1/authorize/decide",
        &json!({
            "client_id": "ghost",
            "grant_type": "client_credentials",
            "scope": "api1",
            "client_secret": "x"
        }),
    );
    let bad_secret = post_json(
        "/api/v1/authorize/decide",
        &json!({
            "client_id": "service",
            "grant_type": "client_credentials",
            "scope": "api1",
            "client_secret": "x"
        }),
    );

    let a = json_body(app.clone().oneshot(unknown).await.unwrap()).await;
    let b = json_body(app.oneshot(bad_secret).await.unwrap()).await;
    assert_eq!(a, b);
    assert_eq!(a["outcome"], "denied");
    assert_eq!(a["error"], "invalid_client");
}

#[tokio::test]
async fn malformed_scope_is_a_bad_request() {
    let app = harness().router();
    let req = post_json(
        "/api/v1/authorize/decide",
        &json!({
            "client_id": "  ",
            "grant_type": "hybrid",
            "scope": "openid",
            "subject_id": "alice"
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_error_response(resp, StatusCode::BAD_REQUEST, "invalid_request").await;
}

/// 同意フロー全体: decide -> consent -> 一覧 -> 取り消し
#[tokio::test]
async fn consent_round_trip_over_http() {
    let app = harness().router();

    let decide = post_json(
        "/api/v1/authorize/decide",
        &json!({
            "client_id": "mvc",
            "grant_type": "hybrid",
            "scope": "openid profile api1",
            "subject_id": "alice",
            "redirect_uri": MVC_REDIRECT,
            "session_id": "s-1"
        }),
    );
    let parked = json_body(app.clone().oneshot(decide).await.unwrap()).await;
    assert_eq!(parked["outcome"], "consent_required");
    assert_eq!(parked["scopes"], json!(["api1", "openid", "profile"]));
    let return_url = parked["return_url"].as_str().unwrap().to_string();
    assert!(return_url.starts_with(&format!("{ISSUER}/connect/authorize/callback?flow=")));

    let consent = post_json(
        "/api/v1/consent",
        &json!({
            "subject_id": "alice",
            "button": "yes",
            "scopesConsented": ["openid", "api1"],
            "rememberConsent": true,
            "returnUrl": return_url
        }),
    );
    let resp = app.clone().oneshot(consent).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let answered = json_body(resp).await;
    assert_eq!(answered["outcome"], "granted");
    assert_eq!(answered["scopes"], json!(["api1", "openid"]));

    let list = Request::builder()
        .method("GET")
        .uri("/api/v1/consent/alice")
        .body(Body::empty())
        .unwrap();
    let listed = json_body(app.clone().oneshot(list).await.unwrap()).await;
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["client_id"], "mvc");
    assert_eq!(items[0]["remember"], true);

    let revoke = Request::builder()
        .method("DELETE")
        .uri("/api/v1/consent/alice/mvc")
        .body(Body::empty())
        .unwrap();
    let revoked = json_body(app.clone().oneshot(revoke).await.unwrap()).await;
    assert_eq!(revoked, json!({ "revoked": true }));

    let revoke_again = Request::builder()
        .method("DELETE")
        .uri("/api/v1/consent/alice/mvc")
        .body(Body::empty())
        .unwrap();
    let revoked = json_body(app.oneshot(revoke_again).await.unwrap()).await;
    assert_eq!(revoked, json!({ "revoked": false }));
}

#[tokio::test]
async fn answering_unknown_flow_is_not_found() {
    let app = harness().router();
    let req = post_json(
        "/api/v1/consent",
        &json!({
            "subject_id": "alice",
            "button": "yes",
            "scopesConsented": ["openid"],
            "returnUrl": "/connect/authorize/callback?flow=4b1f2c9e-2f0a-4a53-9d0b-6f8a0d3c2e11"
        }),
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_error_response(resp, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn redirect_validation_endpoints() {
    let app = harness().router();

    let cases = [
        ("/api/v1/clients/redirect/validate", "mvc", MVC_REDIRECT, true),
        ("/api/v1/clients/redirect/validate", "mvc", MVC_POST_LOGOUT, false),
        ("/api/v1/clients/redirect/validate", "ghost", MVC_REDIRECT, false),
        ("/api/v1/clients/post-logout-redirect/validate", "mvc", MVC_POST_LOGOUT, true),
        ("/api/v1/clients/post-logout-redirect/validate", "mvc", MVC_REDIRECT, false),
    ];
    for (uri, client, target, expected) in cases {
        let req = post_json(uri, &json!({ "client_id": client, "uri": target }));
        let body: Value = json_body(app.clone().oneshot(req).await.unwrap()).await;
        assert_eq!(body["valid"], expected, "{uri} {client} {target}");
    }
}

#[tokio::test]
async fn openapi_document_lists_the_decision_endpoint() {
    use utoipa::OpenApi;
    let doc = clientgate::presentation::http::openapi::ApiDoc::openapi();
    let json = serde_json::to_value(&doc).unwrap();
    assert!(json["paths"].get("/api/v1/authorize/decide").is_some());
    assert!(json["paths"].get("/api/v1/consent/{subject_id}/{client_id}").is_some());
}
