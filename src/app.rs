use std::sync::Arc;

use axum::http::Method;
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::audit::{AuditHook, TracingAudit};
use crate::authz::middleware::access_gate;
use crate::authz::AccessGate;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes;
use crate::routing::RouteTable;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub routes: Arc<RouteTable>,
    pub jwt: Arc<JwtConfig>,
}

pub async fn create_app(config: AppConfig) -> Result<Router, AppError> {
    create_app_with_audit(config, Arc::new(TracingAudit)).await
}

pub async fn create_app_with_audit(config: AppConfig, audit: Arc<dyn AuditHook>) -> Result<Router, AppError> {
    config.policy.validate()?;

    let policy = Arc::new(config.policy);
    let (gated, table) = routes::gated(&policy).finish();

    tracing::debug!(routes = table.entries().len(), "registered gated routes");

    let state = AppState {
        gate: Arc::new(AccessGate::new(policy).with_audit(audit)),
        routes: Arc::new(table),
        jwt: Arc::new(config.jwt),
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let router = gated
        .route_layer(middleware::from_fn_with_state(state.clone(), access_gate))
        .nest("/api", routes::api())
        .merge(crate::docs::swagger()?)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
