//! Role-restricted back-office views.
//!
//! Route names follow `{module}_{action}` so the gate can derive the module
//! and look up its allowed roles.

use axum::extract::Path;
use axum::Json;

use super::Page;
use crate::jwt::AuthUser;
use crate::routing::RouteRegistry;

pub fn register(registry: RouteRegistry<'_>) -> RouteRegistry<'_> {
    registry
        // Users
        .get("/admin/users", "users_admin_index", users_index)
        .get("/admin/users/:id", "users_admin_show", users_show)
        .post("/admin/users", "users_admin_store", users_store)
        .put("/admin/users/:id", "users_admin_update", users_update)
        .delete("/admin/users/:id", "users_admin_destroy", users_destroy)
        // Roles
        .get("/admin/roles", "roles_admin_index", roles_index)
        .post("/admin/roles", "roles_admin_store", roles_store)
        .put("/admin/roles/:id", "roles_admin_update", roles_update)
        .delete("/admin/roles/:id", "roles_admin_destroy", roles_destroy)
        // Seller customers
        .get("/seller/customers", "customers_seller_index", customers_index)
        .post("/seller/customers", "customers_seller_store", customers_store)
        .delete("/seller/customers/:id", "customers_seller_delete", customers_delete)
        // Reports
        .get("/seller/reports/export", "reports_export", reports_export)
}

async fn users_index(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Admin/Users/Index", "users_admin_index"))
}

async fn users_show(_auth: AuthUser, Path(id): Path<String>) -> Json<Page> {
    tracing::debug!(user = %id, "show user");
    Json(Page::new("Admin/Users/Components/UserEdit", "users_admin_show"))
}

async fn users_store(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Admin/Users/Components/UserCreate", "users_admin_store"))
}

async fn users_update(_auth: AuthUser, Path(id): Path<String>) -> Json<Page> {
    tracing::debug!(user = %id, "update user");
    Json(Page::new("Admin/Users/Components/UserEdit", "users_admin_update"))
}

async fn users_destroy(_auth: AuthUser, Path(id): Path<String>) -> Json<Page> {
    tracing::debug!(user = %id, "destroy user");
    Json(Page::new("Admin/Users/Components/UserDelete", "users_admin_destroy"))
}

async fn roles_index(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Admin/Roles/Index", "roles_admin_index"))
}

async fn roles_store(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Admin/Roles/Components/RoleCreate", "roles_admin_store"))
}

async fn roles_update(_auth: AuthUser, Path(id): Path<String>) -> Json<Page> {
    tracing::debug!(role = %id, "update role");
    Json(Page::new("Admin/Roles/Components/RoleEdit", "roles_admin_update"))
}

async fn roles_destroy(_auth: AuthUser, Path(id): Path<String>) -> Json<Page> {
    tracing::debug!(role = %id, "destroy role");
    Json(Page::new("Admin/Roles/Components/RoleDelete", "roles_admin_destroy"))
}

async fn customers_index(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Seller/Customers/Index", "customers_seller_index"))
}

async fn customers_store(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Seller/Customers/Components/CustomerCreate", "customers_seller_store"))
}

async fn customers_delete(_auth: AuthUser, Path(id): Path<String>) -> Json<Page> {
    tracing::debug!(customer = %id, "delete customer");
    Json(Page::new("Seller/Customers/Components/CustomerDelete", "customers_seller_delete"))
}

async fn reports_export(_auth: AuthUser) -> Json<Page> {
    Json(Page::new("Seller/Sale/ReportSale", "reports_export"))
}
