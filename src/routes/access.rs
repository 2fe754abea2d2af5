use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::app::AppState;
use crate::authz::{Decision, UserContext};
use crate::errors::{AppError, AppResult};
use crate::jwt::SessionUser;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccessQuery {
    /// Route name to evaluate
    pub route: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessCheckResponse {
    pub route: String,
    /// allow, pass_through or deny_redirect
    #[schema(example = "deny_redirect")]
    pub decision: &'static str,
    /// Redirect target for denials
    #[schema(example = "dashboard")]
    pub target: Option<String>,
    pub user: UserContext,
}

impl AccessCheckResponse {
    fn new(route: String, decision: Decision, user: UserContext) -> Self {
        let (decision, target) = match decision {
            Decision::Allow => ("allow", None),
            Decision::PassThrough => ("pass_through", None),
            Decision::DenyRedirect(target) => ("deny_redirect", Some(target)),
        };
        Self {
            route,
            decision,
            target,
            user,
        }
    }
}

/// Evaluate the gate for the calling user against a route name
#[utoipa::path(
    get,
    path = "/api/access",
    tag = "Access",
    params(AccessQuery),
    responses(
        (status = 200, description = "Gate decision", body = AccessCheckResponse),
        (status = 400, description = "Empty route name"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_access(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Query(query): Query<AccessQuery>,
) -> AppResult<Json<AccessCheckResponse>> {
    let route = query.route.trim().to_string();
    if route.is_empty() {
        return Err(AppError::bad_request("route must not be empty"));
    }

    let decision = state.gate.evaluate(&route, &user);
    Ok(Json(AccessCheckResponse::new(route, decision, user)))
}
