use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tempfile::tempdir;
use tower::util::ServiceExt;
use uuid::Uuid;

use access_gate::errors::PolicyError;
use access_gate::jwt::JwtConfig;
use access_gate::{create_app, AccessGate, AppConfig, Decision, GatePolicy, UserContext};

#[test]
fn shipped_policy_file_matches_embedded_defaults() -> Result<()> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/gate_policy.toml");
    let policy = GatePolicy::from_path(&path)?;
    assert_eq!(policy, GatePolicy::default());
    Ok(())
}

#[test]
fn missing_and_malformed_files_are_reported() -> Result<()> {
    let dir = tempdir()?;

    let missing = GatePolicy::from_path(&dir.path().join("absent.toml"));
    assert!(matches!(missing, Err(PolicyError::Read { .. })));

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "public_routes = [\"login\"\n")?;
    assert!(matches!(GatePolicy::from_path(&broken), Err(PolicyError::Parse(_))));

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(
        &invalid,
        r#"
        public_routes = []
        authenticated_routes = []
        global_modules = []

        [actions]
        "bulk_delete" = "can_delete"

        [module_roles]
        "#,
    )?;
    assert!(matches!(GatePolicy::from_path(&invalid), Err(PolicyError::Invalid(_))));

    Ok(())
}

#[tokio::test]
async fn file_policy_drives_the_gate() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("policy.toml");
    std::fs::write(
        &path,
        r#"
        public_routes = ["index", "login"]
        authenticated_routes = ["dashboard"]
        global_modules = ["dashboard"]

        [actions]
        index = "can_read"
        store = "can_create"
        delete = "can_delete"

        [module_roles]
        customers_seller = ["ADMIN", "CLIENTE"]
        "#,
    )?;
    let policy = GatePolicy::from_path(&path)?;

    let gate = AccessGate::new(Arc::new(policy.clone()));
    let cliente = UserContext::authenticated(Uuid::new_v4()).with_role("CLIENTE");
    assert_eq!(gate.evaluate("customers_seller_index", &cliente), Decision::Allow);
    assert_eq!(
        gate.evaluate("users_admin_index", &cliente),
        Decision::DenyRedirect("dashboard".to_string())
    );

    // "register" is no longer public in this file
    assert_eq!(
        gate.evaluate("register", &UserContext::anonymous()),
        Decision::PassThrough
    );

    let jwt = JwtConfig::new("file-secret", 1);
    let token = jwt.encode(Uuid::new_v4(), Some("CLIENTE"), false)?;
    let app = create_app(AppConfig::new(jwt, policy)).await?;

    let req = Request::builder()
        .method("POST")
        .uri("/seller/customers")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .method("GET")
        .uri("/admin/roles")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    Ok(())
}
