use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::policy::{GatePolicy, RouteClass};
use super::principal::UserContext;
use super::DENY_REDIRECT_TARGET;
use crate::audit::{AuditHook, DenialEvent};

/// Outcome of a gate evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum Decision {
    /// Forward the request unchanged
    Allow,
    /// Not signed in; the outer authentication layer decides
    PassThrough,
    /// Redirect to the named route
    DenyRedirect(String),
}

impl Decision {
    fn deny() -> Self {
        Decision::DenyRedirect(DENY_REDIRECT_TARGET.to_string())
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::DenyRedirect(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    MissingRole,
    RoleNotPermitted,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::MissingRole => f.write_str("missing_role"),
            DenyReason::RoleNotPermitted => f.write_str("role_not_permitted"),
        }
    }
}

/// Per-request access gate.
///
/// Evaluation order:
/// 1. unresolved or public route -> allow
/// 2. not signed in -> pass through
/// 3. authenticated-only route, no action token, empty module, global module -> allow
/// 4. superuser -> allow
/// 5. no role -> deny
/// 6. role not listed for the module -> deny
/// 7. allow
#[derive(Clone)]
pub struct AccessGate {
    policy: Arc<GatePolicy>,
    audit: Option<Arc<dyn AuditHook>>,
}

impl AccessGate {
    pub fn new(policy: Arc<GatePolicy>) -> Self {
        Self {
            policy,
            audit: None,
        }
    }

    pub fn with_audit(mut self, hook: Arc<dyn AuditHook>) -> Self {
        self.audit = Some(hook);
        self
    }

    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    pub fn evaluate(&self, route_name: &str, user: &UserContext) -> Decision {
        let class = self.policy.classify(route_name);
        self.evaluate_class(route_name, &class, user)
    }

    /// Same decision as [`AccessGate::evaluate`] for a route classified ahead of time.
    pub fn evaluate_class(&self, route_name: &str, class: &RouteClass, user: &UserContext) -> Decision {
        match self.decide(class, user) {
            Ok(decision) => decision,
            Err(reason) => {
                tracing::debug!(
                    route = %route_name,
                    user_id = ?user.user_id,
                    role = ?user.role_name(),
                    reason = %reason,
                    "access denied"
                );
                if let Some(hook) = &self.audit {
                    hook.denied(&DenialEvent::new(
                        route_name,
                        user.user_id,
                        user.role_name(),
                        reason,
                    ));
                }
                Decision::deny()
            }
        }
    }

    fn decide(&self, class: &RouteClass, user: &UserContext) -> Result<Decision, DenyReason> {
        let (module, permission) = match class {
            RouteClass::Unresolved | RouteClass::Public => return Ok(Decision::Allow),
            _ if !user.is_authenticated => return Ok(Decision::PassThrough),
            RouteClass::Authenticated | RouteClass::Unscoped | RouteClass::Global { .. } => {
                return Ok(Decision::Allow)
            }
            RouteClass::Restricted {
                module, permission, ..
            } => (module, permission),
        };

        if user.is_superuser {
            tracing::debug!(
                user_id = ?user.user_id,
                module = %module,
                "superuser bypass"
            );
            return Ok(Decision::Allow);
        }

        let role = user.role_name().ok_or(DenyReason::MissingRole)?;
        if !self.policy.role_allowed(module, role) {
            return Err(DenyReason::RoleNotPermitted);
        }

        tracing::debug!(
            user_id = ?user.user_id,
            module = %module,
            permission = %permission,
            role = %role,
            "module role match"
        );
        Ok(Decision::Allow)
    }
}
