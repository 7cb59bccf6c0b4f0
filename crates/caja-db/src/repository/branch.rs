//! # Branch Repository
//!
//! Branch lookups used by sale generation (VAT flag, existence check).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use caja_core::{Branch, RecordStatus};

/// Repository for branch database operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    /// Creates a new BranchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    /// Gets a branch by ID, whatever its status.
    ///
    /// ## Returns
    /// * `Ok(Some(Branch))` - Branch found
    /// * `Ok(None)` - Branch not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, name, vat_enabled, status, created_at
            FROM branches
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }

    /// Inserts an active branch and returns it.
    pub async fn insert(&self, name: &str, vat_enabled: bool) -> DbResult<Branch> {
        debug!(name = %name, vat_enabled, "Inserting branch");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO branches (name, vat_enabled, status, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(vat_enabled)
        .bind(RecordStatus::Active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Branch {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            vat_enabled,
            status: RecordStatus::Active,
            created_at: now,
        })
    }
}
