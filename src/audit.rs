//! Denial audit hooks.
//!
//! The gate calls an [`AuditHook`] only when it denies a request. Hooks run
//! inline on the request task, so they must not block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::authz::DenyReason;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenialEvent {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub route: String,
    pub user_id: Option<Uuid>,
    pub role: Option<String>,
    pub reason: DenyReason,
}

impl DenialEvent {
    pub fn new(route: &str, user_id: Option<Uuid>, role: Option<&str>, reason: DenyReason) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            route: route.to_string(),
            user_id,
            role: role.map(str::to_string),
            reason,
        }
    }
}

pub trait AuditHook: Send + Sync {
    fn denied(&self, event: &DenialEvent);
}

/// Writes one warning line per denial
#[derive(Debug, Clone, Default)]
pub struct TracingAudit;

impl AuditHook for TracingAudit {
    fn denied(&self, event: &DenialEvent) {
        tracing::warn!(
            event_id = %event.id,
            route = %event.route,
            user_id = ?event.user_id,
            role = ?event.role,
            reason = %event.reason,
            "access denied"
        );
    }
}

pub type AuditBus = broadcast::Sender<Value>;

pub fn init_audit_bus() -> (AuditBus, broadcast::Receiver<Value>) {
    broadcast::channel(1024)
}

/// Publishes denials as JSON on a broadcast channel. Slow receivers lag and
/// lose events; the sender never waits.
#[derive(Debug, Clone)]
pub struct BroadcastAudit {
    bus: AuditBus,
}

impl BroadcastAudit {
    pub fn new(bus: AuditBus) -> Self {
        Self { bus }
    }
}

impl AuditHook for BroadcastAudit {
    fn denied(&self, event: &DenialEvent) {
        match serde_json::to_value(event) {
            // No receivers is not an error worth reporting
            Ok(value) => {
                let _ = self.bus.send(value);
            }
            Err(err) => {
                tracing::error!(error = %err, route = %event.route, "failed to encode denial event");
            }
        }
    }
}
