use axum::Json;

use super::Page;
use crate::jwt::AuthUser;
use crate::routing::RouteRegistry;

pub fn register(registry: RouteRegistry<'_>) -> RouteRegistry<'_> {
    registry
        .get("/dashboard", "dashboard", dashboard)
        .get("/profile", "profile_index", profile_index)
        .put("/profile", "profile_update", profile_update)
        .put("/profile/password", "profile_change_password", profile_change_password)
        .delete("/profile", "profile_delete_account", profile_delete_account)
}

async fn dashboard(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("DashBoard/Index", "dashboard"))
}

async fn profile_index(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Profile/Index", "profile_index"))
}

async fn profile_update(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Profile/Index", "profile_update"))
}

async fn profile_change_password(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Profile/Index", "profile_change_password"))
}

async fn profile_delete_account(auth: AuthUser) -> Json<Page> {
    tracing::info!(user_id = %auth.user_id, "account deletion requested");
    Json(Page::new("Auth/LoginPage", "profile_delete_account"))
}
