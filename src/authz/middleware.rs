//! Axum middleware that runs the access gate in front of every registered route.
//!
//! Installed with `route_layer`, so it only sees requests the router matched;
//! anything else never gets a route name and falls through to the 404 handler.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::{Decision, RouteClass};
use crate::app::AppState;
use crate::jwt::SessionUser;

pub async fn access_gate(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    matched: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let entry = matched
        .as_ref()
        .and_then(|path| state.routes.resolve(request.method(), path.as_str()));

    let decision = match entry {
        Some(entry) => state.gate.evaluate_class(entry.name, &entry.class, &user),
        None => state.gate.evaluate_class("", &RouteClass::Unresolved, &user),
    };

    match decision {
        Decision::Allow | Decision::PassThrough => next.run(request).await,
        Decision::DenyRedirect(target) => {
            let location = state.routes.path_for(&target);
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                location = %location,
                "redirecting denied request"
            );
            Redirect::to(&location).into_response()
        }
    }
}
