//! # Customer Repository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use caja_core::{Customer, RecordStatus};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, phone, status, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts an active customer and returns it.
    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DbResult<Customer> {
        debug!(name = %name, "Inserting customer");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, email, phone, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(RecordStatus::Active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            status: RecordStatus::Active,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let inserted = db
            .customers()
            .insert("María López", Some("maria@example.com"), None)
            .await
            .unwrap();
        let fetched = db.customers().get_by_id(inserted.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "María López");
        assert_eq!(fetched.email.as_deref(), Some("maria@example.com"));
        assert_eq!(fetched.phone, None);
        assert!(db.customers().get_by_id(inserted.id + 1).await.unwrap().is_none());
    }
}
