//! # Role Repository
//!
//! Roles, permissions and the grants that link them.
//!
//! ```text
//! users ──role_id──► roles ◄──role_id── role_permissions ──permission_id──► permissions
//!                                                                      (system_page, name)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use caja_core::permission::{PermissionGrant, SystemPage};
use caja_core::RecordStatus;

/// Repository for role and permission database operations.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    /// Creates a new RoleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoleRepository { pool }
    }

    /// Resolves the grants held by a role.
    ///
    /// An unknown role resolves to an empty grant set.
    pub async fn grants_for_role(&self, role_id: i64) -> DbResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, (SystemPage, String)>(
            r#"
            SELECT p.system_page, p.name
            FROM role_permissions rp
            INNER JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_id = ?1
            ORDER BY p.id
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(role_id, grants = rows.len(), "Resolved role grants");
        Ok(rows
            .into_iter()
            .map(|(system_page, name)| PermissionGrant::new(system_page, name))
            .collect())
    }

    /// Resolves the grants of an active user's role.
    pub async fn grants_for_user(&self, user_id: i64) -> DbResult<Vec<PermissionGrant>> {
        let role_id: Option<i64> = sqlx::query_scalar(
            "SELECT role_id FROM users WHERE id = ?1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match role_id {
            Some(role_id) => self.grants_for_role(role_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Inserts a role and returns its id.
    pub async fn insert_role(&self, name: &str) -> DbResult<i64> {
        debug!(name = %name, "Inserting role");

        let result = sqlx::query(
            "INSERT INTO roles (name, status, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(RecordStatus::Active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a permission and returns its id.
    pub async fn insert_permission(&self, system_page: SystemPage, name: &str) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO permissions (system_page, name) VALUES (?1, ?2)")
            .bind(system_page)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Grants a permission to a role. Granting twice is a no-op.
    pub async fn grant_permission(&self, role_id: i64, permission_id: i64) -> DbResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?1, ?2)",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts an active user holding `role_id` and returns its id.
    pub async fn insert_user(&self, name: &str, email: &str, role_id: i64) -> DbResult<i64> {
        debug!(email = %email, role_id, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, role_id, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(role_id)
        .bind(RecordStatus::Active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
