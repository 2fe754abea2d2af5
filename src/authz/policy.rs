//! Static gate tables and route-name classification.
//!
//! A [`GatePolicy`] is built once at startup (embedded defaults or a TOML
//! file) and shared read-only behind an `Arc`. Nothing mutates it afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{actions, roles, PermissionKind};
use crate::errors::PolicyError;

const DEFAULT_SEPARATOR: char = '_';

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePolicy {
    /// Separator between route-name tokens
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Routes that bypass every check
    pub public_routes: BTreeSet<String>,
    /// Routes that only require a signed-in user
    pub authenticated_routes: BTreeSet<String>,
    /// Modules reachable by any signed-in user regardless of role
    pub global_modules: BTreeSet<String>,
    /// Action token -> permission kind
    pub actions: BTreeMap<String, PermissionKind>,
    /// Module -> roles allowed on any of its actions. A missing module allows nobody.
    pub module_roles: BTreeMap<String, BTreeSet<String>>,
}

/// Structural classification of a route name, computed once per route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteClass {
    /// The router could not name the route
    Unresolved,
    Public,
    Authenticated,
    /// No recognised action token, or nothing precedes it
    Unscoped,
    Global { module: String },
    Restricted {
        module: String,
        action: String,
        permission: PermissionKind,
    },
}

impl Default for GatePolicy {
    fn default() -> Self {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();

        let actions = [
            (actions::INDEX, PermissionKind::CanRead),
            (actions::SHOW, PermissionKind::CanRead),
            (actions::STORE, PermissionKind::CanCreate),
            (actions::CREATE, PermissionKind::CanCreate),
            (actions::UPDATE, PermissionKind::CanUpdate),
            (actions::EDIT, PermissionKind::CanUpdate),
            (actions::DESTROY, PermissionKind::CanDelete),
            (actions::DELETE, PermissionKind::CanDelete),
        ]
        .into_iter()
        .map(|(token, kind)| (token.to_string(), kind))
        .collect();

        let module_roles = ["users_admin", "roles_admin", "customers_seller"]
            .into_iter()
            .map(|module| (module.to_string(), set(&[roles::ADMIN])))
            .collect();

        Self {
            separator: DEFAULT_SEPARATOR,
            public_routes: set(&[
                "index",
                "login",
                "register",
                "check_email",
                "verify_code",
                "resend_code",
                "login_2fa",
                "verify_2fa",
                "resend_2fa",
            ]),
            authenticated_routes: set(&[
                "dashboard",
                "profile_index",
                "profile_update",
                "profile_change_password",
                "profile_delete_account",
                "logout",
            ]),
            global_modules: set(&["dashboard", "profile"]),
            actions,
            module_roles,
        }
    }
}

impl GatePolicy {
    pub fn from_toml_str(raw: &str) -> Result<Self, PolicyError> {
        let policy: GatePolicy = toml::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_path(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let policy = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            modules = policy.module_roles.len(),
            actions = policy.actions.len(),
            "loaded gate policy"
        );
        Ok(policy)
    }

    pub fn to_toml_string(&self) -> Result<String, PolicyError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.separator.is_alphanumeric() {
            return Err(PolicyError::invalid(format!(
                "separator {:?} must not be alphanumeric",
                self.separator
            )));
        }

        for token in self.actions.keys() {
            if token.is_empty() || token.contains(self.separator) {
                return Err(PolicyError::invalid(format!(
                    "action token {token:?} must be a single non-empty token"
                )));
            }
        }

        for (module, allowed) in &self.module_roles {
            if module.is_empty() {
                return Err(PolicyError::invalid("module names must not be empty"));
            }
            if allowed.iter().any(|role| role.is_empty()) {
                return Err(PolicyError::invalid(format!(
                    "module {module:?} lists an empty role name"
                )));
            }
        }

        Ok(())
    }

    /// Split a route name into `(module, action)`.
    ///
    /// The action is the last token found in the action map; the module is
    /// every token before it, re-joined with the separator. Returns `None`
    /// when no token is a known action. The module may come back empty.
    pub fn split_route(&self, route_name: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = route_name.split(self.separator).collect();
        let index = parts
            .iter()
            .rposition(|part| self.actions.contains_key(*part))?;

        let mut buf = [0u8; 4];
        let separator: &str = self.separator.encode_utf8(&mut buf);
        Some((parts[..index].join(separator), parts[index].to_string()))
    }

    pub fn classify(&self, route_name: &str) -> RouteClass {
        if route_name.is_empty() {
            return RouteClass::Unresolved;
        }
        if self.public_routes.contains(route_name) {
            return RouteClass::Public;
        }
        if self.authenticated_routes.contains(route_name) {
            return RouteClass::Authenticated;
        }

        let Some((module, action)) = self.split_route(route_name) else {
            return RouteClass::Unscoped;
        };
        if module.is_empty() {
            return RouteClass::Unscoped;
        }
        if self.global_modules.contains(&module) {
            return RouteClass::Global { module };
        }

        match self.actions.get(&action) {
            Some(&permission) => RouteClass::Restricted {
                module,
                action,
                permission,
            },
            None => RouteClass::Unscoped,
        }
    }

    pub fn allowed_roles(&self, module: &str) -> impl Iterator<Item = &str> {
        self.module_roles
            .get(module)
            .into_iter()
            .flat_map(|allowed| allowed.iter().map(String::as_str))
    }

    pub fn role_allowed(&self, module: &str, role: &str) -> bool {
        self.module_roles
            .get(module)
            .map(|allowed| allowed.contains(role))
            .unwrap_or(false)
    }
}
