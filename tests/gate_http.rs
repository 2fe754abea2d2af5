use std::sync::Arc;

use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

use access_gate::audit::{init_audit_bus, BroadcastAudit};
use access_gate::jwt::JwtConfig;
use access_gate::{create_app, create_app_with_audit, AppConfig, GatePolicy};

const SECRET: &str = "test-secret";

fn config() -> AppConfig {
    AppConfig::new(JwtConfig::new(SECRET, 1), GatePolicy::default())
}

fn token(role: Option<&str>, superuser: bool) -> Result<String> {
    Ok(JwtConfig::new(SECRET, 1).encode(Uuid::new_v4(), role, superuser)?)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>) -> Result<Response> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(app.clone().oneshot(req.body(Body::empty())?).await?)
}

async fn json_body(resp: Response) -> Result<Value> {
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn location(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn public_routes_are_open_to_anonymous_visitors() -> Result<()> {
    let app = create_app(config()).await?;

    for (method, uri) in [
        (Method::GET, "/"),
        (Method::POST, "/login"),
        (Method::GET, "/register"),
        (Method::POST, "/register"),
        (Method::GET, "/login/2fa"),
        (Method::POST, "/verify-code"),
    ] {
        let resp = send(&app, method.clone(), uri, None).await?;
        assert_eq!(resp.status(), StatusCode::OK, "{method} {uri}");
    }

    Ok(())
}

#[tokio::test]
async fn anonymous_requests_are_left_to_the_auth_layer() -> Result<()> {
    let app = create_app(config()).await?;

    for uri in ["/dashboard", "/profile", "/admin/users", "/seller/reports/export"] {
        let resp = send(&app, Method::GET, uri, None).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert!(location(&resp).is_none());
    }

    // A bad token is treated as no session at all
    let resp = send(&app, Method::GET, "/admin/users", Some("not-a-jwt")).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn module_roles_gate_admin_routes() -> Result<()> {
    let app = create_app(config()).await?;
    let admin = token(Some("ADMIN"), false)?;
    let cliente = token(Some("CLIENTE"), false)?;

    let resp = send(&app, Method::GET, "/admin/users/42", Some(&admin)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await?;
    assert_eq!(body["route"], "users_admin_show");

    let resp = send(&app, Method::GET, "/admin/users/42", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));

    let resp = send(&app, Method::POST, "/seller/customers", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // HEAD is served by the GET handler and must be gated the same way
    let resp = send(&app, Method::HEAD, "/admin/users", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    Ok(())
}

#[tokio::test]
async fn signed_in_user_without_role_is_redirected() -> Result<()> {
    let app = create_app(config()).await?;
    let no_role = token(None, false)?;

    let resp = send(&app, Method::GET, "/admin/roles", Some(&no_role)).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));

    // Authenticated-only routes do not need a role
    let resp = send(&app, Method::GET, "/dashboard", Some(&no_role)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn superuser_skips_module_roles() -> Result<()> {
    let app = create_app(config()).await?;
    let root = token(Some("CLIENTE"), true)?;

    let resp = send(&app, Method::DELETE, "/admin/roles/7", Some(&root)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, Method::DELETE, "/seller/customers/3", Some(&root)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn global_and_unscoped_routes_fail_open_for_signed_in_users() -> Result<()> {
    let app = create_app(config()).await?;
    let cliente = token(Some("CLIENTE"), false)?;

    let resp = send(&app, Method::PUT, "/profile", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, Method::GET, "/seller/reports/export", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await?;
    assert_eq!(body["route"], "reports_export");

    Ok(())
}

#[tokio::test]
async fn unknown_paths_reach_the_router() -> Result<()> {
    let app = create_app(config()).await?;
    let cliente = token(Some("CLIENTE"), false)?;

    let resp = send(&app, Method::GET, "/admin/nowhere", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn access_endpoint_reports_decisions() -> Result<()> {
    let app = create_app(config()).await?;
    let cliente = token(Some("CLIENTE"), false)?;

    let resp = send(&app, Method::GET, "/api/access?route=users_admin_show", Some(&cliente)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await?;
    assert_eq!(body["decision"], "deny_redirect");
    assert_eq!(body["target"], "dashboard");
    assert_eq!(body["user"]["current_role"]["name"], "CLIENTE");

    let resp = send(&app, Method::GET, "/api/access?route=roles_admin_index", None).await?;
    let body = json_body(resp).await?;
    assert_eq!(body["decision"], "pass_through");
    assert_eq!(body["target"], Value::Null);

    let resp = send(&app, Method::GET, "/api/access?route=%20", None).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn health_endpoint_is_not_gated() -> Result<()> {
    let app = create_app(config()).await?;

    let resp = send(&app, Method::GET, "/api/health", None).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await?;
    assert_eq!(body["status"], "ok");
    assert!(body["gated_routes"].as_u64().unwrap_or(0) > 0);

    Ok(())
}

#[tokio::test]
async fn denials_are_published_to_the_audit_bus() -> Result<()> {
    let (bus, mut rx) = init_audit_bus();
    let app = create_app_with_audit(config(), Arc::new(BroadcastAudit::new(bus))).await?;
    let premiun = token(Some("PREMIUN"), false)?;

    let resp = send(&app, Method::GET, "/admin/users", Some(&premiun)).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let event = rx.try_recv()?;
    assert_eq!(event["route"], "users_admin_index");
    assert_eq!(event["role"], "PREMIUN");
    assert_eq!(event["reason"], "role_not_permitted");

    // Allowed requests publish nothing
    let resp = send(&app, Method::GET, "/profile", Some(&premiun)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(rx.try_recv().is_err());

    Ok(())
}
