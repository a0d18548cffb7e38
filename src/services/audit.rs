// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Best-effort audit recorder.
//!
//! Primary operations emit an event after their own effect has committed;
//! a background writer task persists the rows. Nothing here can fail the
//! emitting operation: a non-admin actor is a silent no-op and every
//! persistence error is swallowed after logging.

use crate::db::Db;
use crate::middleware::auth::AuthUser;
use crate::models::Role;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One audit event in flight between an operation and the writer task.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: String,
    pub details: String,
    pub entity_id: Option<String>,
    pub admin_id: Uuid,
}

/// Handle used by admin-privileged operations to emit audit events.
#[derive(Clone)]
pub struct AuditRecorder {
    tx: mpsc::UnboundedSender<AuditEvent>,
}

impl AuditRecorder {
    /// Create a recorder and the receiving end for [`spawn_audit_writer`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AuditEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit one audit event for the acting admin.
    ///
    /// A non-admin actor produces no event and no error.
    pub fn record(
        &self,
        actor: &AuthUser,
        action: &str,
        details: impl Into<String>,
        entity_id: Option<String>,
    ) {
        if actor.role != Role::Admin {
            tracing::debug!(
                user_id = %actor.user_id,
                action,
                "Skipping audit record for non-admin actor"
            );
            return;
        }

        let event = AuditEvent {
            action: action.to_string(),
            details: details.into(),
            entity_id,
            admin_id: actor.user_id,
        };

        if self.tx.send(event).is_err() {
            tracing::error!(action, "Audit channel closed, event dropped");
        }
    }
}

/// Spawn the background task that persists audit events.
///
/// Persistence failures are logged to the operator's error channel and
/// otherwise dropped; they never reach the operation that emitted the
/// event.
pub fn spawn_audit_writer(
    db: Db,
    mut rx: mpsc::UnboundedReceiver<AuditEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(e) = db.insert_audit_log(&event).await {
                tracing::error!(
                    error = %e,
                    action = %event.action,
                    admin_id = %event.admin_id,
                    "Failed to persist audit record"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::from_u128(7),
            role,
        }
    }

    #[test]
    fn test_non_admin_actor_is_silent_noop() {
        let (recorder, mut rx) = AuditRecorder::new();

        recorder.record(&actor(Role::User), "system_stats_viewed", "details", None);

        assert!(rx.try_recv().is_err(), "no event should be emitted");
    }

    #[test]
    fn test_admin_actor_emits_event() {
        let (recorder, mut rx) = AuditRecorder::new();

        recorder.record(
            &actor(Role::Admin),
            "system_stats_viewed",
            "Viewed system statistics",
            Some("stats".to_string()),
        );

        let event = rx.try_recv().expect("event should be emitted");
        assert_eq!(event.action, "system_stats_viewed");
        assert_eq!(event.admin_id, Uuid::from_u128(7));
        assert_eq!(event.entity_id.as_deref(), Some("stats"));
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (recorder, rx) = AuditRecorder::new();
        drop(rx);

        // Must not raise to the caller even with no writer listening.
        recorder.record(&actor(Role::Admin), "system_stats_viewed", "details", None);
    }
}
