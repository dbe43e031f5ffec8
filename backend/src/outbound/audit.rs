//! Tracing-backed audit sink.
//!
//! Verification lookups are publicly reachable, so the office wants a
//! record of what is being checked. This adapter renders each event as a
//! structured tracing line; a future adapter could ship them elsewhere
//! without the domain noticing.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AuditEvent, AuditLog};

/// Audit log writing structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, event: AuditEvent) {
        info!(
            target: "audit",
            action = event.action,
            subject = %event.subject,
            success = event.success,
            "verification lookup"
        );
    }
}
