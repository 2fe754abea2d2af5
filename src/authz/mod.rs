//! Authorization module - Access Gate and Middleware
//!
//! This module implements the per-request access gate:
//! - Public and authenticated-only route sets
//! - Module/action derivation from route names
//! - Global modules reachable by any signed-in user
//! - Superuser bypass and module -> role allow-lists (deny by default)

mod evaluator;
pub mod middleware;
pub mod policy;
mod principal;

pub use evaluator::{AccessGate, Decision, DenyReason};
pub use policy::{GatePolicy, RouteClass};
pub use principal::{Role, UserContext};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Route name every denial redirects to
pub const DENY_REDIRECT_TARGET: &str = "dashboard";

/// Well-known role names
pub mod roles {
    pub const ADMIN: &str = "ADMIN";
    pub const CLIENTE: &str = "CLIENTE";
    pub const PREMIUN: &str = "PREMIUN";
}

/// Well-known action tokens
pub mod actions {
    pub const INDEX: &str = "index";
    pub const SHOW: &str = "show";
    pub const STORE: &str = "store";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const EDIT: &str = "edit";
    pub const DESTROY: &str = "destroy";
    pub const DELETE: &str = "delete";
}

/// Permission kind an action token maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    CanRead,
    CanCreate,
    CanUpdate,
    CanDelete,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::CanRead => "can_read",
            PermissionKind::CanCreate => "can_create",
            PermissionKind::CanUpdate => "can_update",
            PermissionKind::CanDelete => "can_delete",
        }
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
