// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! PostgreSQL client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile + onboarding state)
//! - Accounts (encrypted OAuth refresh tokens)
//! - Course subscriptions
//! - Audit log (append-only)

use crate::error::AppError;
use crate::models::{Account, AuditLog, Course, CourseSubscription, User};
use crate::services::audit::AuditEvent;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

const MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL database client.
#[derive(Clone)]
pub struct Db {
    pool: Option<PgPool>,
}

/// Row counts returned by the admin stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    pub total_users: i64,
    pub active_users: i64,
    pub onboarded_users: i64,
    pub total_subscriptions: i64,
    pub total_courses: i64,
}

impl Db {
    /// Connect to PostgreSQL.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to PostgreSQL: {}", e)))?;

        tracing::info!("Connected to PostgreSQL");

        Ok(Self { pool: Some(pool) })
    }

    /// Create a mock database client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    /// Helper to get the pool or return an error if offline.
    pub fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Apply pending schema migrations.
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(self.pool()?)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a user on first login, or refresh the display name on
    /// subsequent logins. Returns the stored row either way.
    pub async fn upsert_login_user(&self, email: &str, name: Option<&str>) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name) VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE SET name = COALESCE(EXCLUDED.name, users.name)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Account (Credential) Operations ─────────────────────────

    /// Get the account row for a (user, provider) pair.
    ///
    /// The provider is a mandatory lookup key: a user may have several
    /// linked providers and a bare first-match would be ambiguous.
    pub async fn get_account(
        &self,
        user_id: Uuid,
        provider: &str,
    ) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE user_id = $1 AND provider = $2",
        )
        .bind(user_id)
        .bind(provider)
        .fetch_optional(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store (or replace) the encrypted refresh token for a provider link.
    pub async fn upsert_account(
        &self,
        user_id: Uuid,
        provider: &str,
        refresh_token_encrypted: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO accounts (user_id, provider, refresh_token_encrypted)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, provider)
             DO UPDATE SET refresh_token_encrypted = EXCLUDED.refresh_token_encrypted",
        )
        .bind(user_id)
        .bind(provider)
        .bind(refresh_token_encrypted)
        .execute(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Subscription Operations ─────────────────────────────────

    /// All course subscriptions owned by a user.
    pub async fn get_subscriptions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CourseSubscription>, AppError> {
        sqlx::query_as::<_, CourseSubscription>(
            "SELECT * FROM course_subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Course Catalog ──────────────────────────────────────────

    /// Full course catalog, ordered by code.
    pub async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY code")
            .fetch_all(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Atomic Onboarding Reset ─────────────────────────────────

    /// Atomically reset a user's onboarding state: delete every course
    /// subscription they own and clear the profile's onboarding fields.
    ///
    /// Both writes run in one transaction so concurrent readers never
    /// observe deleted subscriptions next to a still-"completed" profile,
    /// or the reverse. Concurrent resets for the same user may race; both
    /// transactions write toward the same terminal state.
    pub async fn reset_onboarding(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut tx = self
            .pool()?
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let deleted = sqlx::query("DELETE FROM course_subscriptions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .rows_affected();

        sqlx::query(
            "UPDATE users
             SET onboarding_completed = FALSE,
                 program_group = NULL,
                 anatomy_group = NULL,
                 include_cafeteria = FALSE,
                 class_year = NULL
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id = %user_id,
            subscriptions_deleted = deleted,
            "Onboarding state reset"
        );

        Ok(())
    }

    // ─── Audit Log ───────────────────────────────────────────────

    /// Append one audit row. Rows are never updated or deleted.
    pub async fn insert_audit_log(&self, event: &AuditEvent) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO audit_logs (id, action, details, entity_id, admin_id)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(&event.action)
        .bind(&event.details)
        .bind(&event.entity_id)
        .bind(event.admin_id)
        .execute(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Most recent audit rows, newest first.
    pub async fn recent_audit_logs(&self, limit: i64) -> Result<Vec<AuditLog>, AppError> {
        sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Admin Stats ─────────────────────────────────────────────

    /// Row counts for the admin dashboard.
    pub async fn system_stats(&self) -> Result<SystemStats, AppError> {
        let pool = self.pool()?;

        let count = |sql: &'static str| async move {
            sqlx::query_scalar::<_, i64>(sql)
                .fetch_one(pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        };

        Ok(SystemStats {
            total_users: count("SELECT COUNT(*) FROM users").await?,
            active_users: count("SELECT COUNT(*) FROM users WHERE is_active").await?,
            onboarded_users: count("SELECT COUNT(*) FROM users WHERE onboarding_completed").await?,
            total_subscriptions: count("SELECT COUNT(*) FROM course_subscriptions").await?,
            total_courses: count("SELECT COUNT(*) FROM courses").await?,
        })
    }
}
