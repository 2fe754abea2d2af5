//! Sign-in, registration and verification views.
//!
//! Credentials, verification codes and 2FA delivery belong to the identity
//! service; these endpoints only name the view for each step.

use axum::Json;

use super::Page;
use crate::jwt::AuthUser;
use crate::routing::RouteRegistry;

pub fn register(registry: RouteRegistry<'_>) -> RouteRegistry<'_> {
    registry
        .get("/", "index", index)
        .post("/login", "login", login)
        .get("/register", "register", register_form)
        .post("/register", "register", register_submit)
        .get("/check-email", "check_email", check_email)
        .post("/verify-code", "verify_code", verify_code)
        .post("/resend-code", "resend_code", resend_code)
        .get("/login/2fa", "login_2fa", login_2fa)
        .post("/login/2fa/verify", "verify_2fa", verify_2fa)
        .post("/login/2fa/resend", "resend_2fa", resend_2fa)
        .post("/logout", "logout", logout)
}

async fn index() -> Json<Page> {
    Json(Page::new("Auth/LoginPage", "index"))
}

async fn login() -> Json<Page> {
    Json(Page::new("Auth/Login2FAPage", "login"))
}

async fn register_form() -> Json<Page> {
    Json(Page::new("Auth/RegisterPage", "register"))
}

async fn register_submit() -> Json<Page> {
    Json(Page::new("Auth/CheckEmailPage", "register"))
}

async fn check_email() -> Json<Page> {
    Json(Page::new("Auth/CheckEmailPage", "check_email"))
}

async fn verify_code() -> Json<Page> {
    Json(Page::new("DashBoard/Index", "verify_code"))
}

async fn resend_code() -> Json<Page> {
    Json(Page::new("Auth/CheckEmailPage", "resend_code"))
}

async fn login_2fa() -> Json<Page> {
    Json(Page::new("Auth/Login2FAPage", "login_2fa"))
}

async fn verify_2fa() -> Json<Page> {
    Json(Page::new("DashBoard/Index", "verify_2fa"))
}

async fn resend_2fa() -> Json<Page> {
    Json(Page::new("Auth/Login2FAPage", "resend_2fa"))
}

async fn logout(auth: AuthUser) -> Json<Page> {
    tracing::info!(user_id = %auth.user_id, "logout");
    Json(Page::new("Auth/LoginPage", "logout"))
}
