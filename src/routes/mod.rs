use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::GatePolicy;
use crate::routing::RouteRegistry;

pub mod access;
pub mod account;
pub mod admin;
pub mod auth;
pub mod health;

/// Descriptor of the UI view a gated endpoint renders.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page {
    #[schema(example = "Admin/Users/Index")]
    pub component: &'static str,
    #[schema(example = "users_admin_index")]
    pub route: &'static str,
}

impl Page {
    pub fn new(component: &'static str, route: &'static str) -> Self {
        Self { component, route }
    }
}

/// Every endpoint that sits behind the access gate, with its route name.
pub fn gated(policy: &GatePolicy) -> RouteRegistry<'_> {
    let registry = RouteRegistry::new(policy);
    let registry = auth::register(registry);
    let registry = account::register(registry);
    admin::register(registry)
}

/// Operational endpoints, mounted outside the gate.
pub fn api() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/access", get(access::check_access))
}
