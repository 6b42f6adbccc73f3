//! # Client Repository
//!
//! Database operations for clients.
//!
//! Clients referenced by sales cannot be deleted: the schema declares
//! `ON DELETE RESTRICT`, which surfaces as a
//! [`DbError::ForeignKeyViolation`] here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::Client;

const SELECT_COLUMNS: &str = "id, first_name, last_name, phone, email, address, city, \
     id_document, portal_password_hash, created_at, updated_at";

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Gets a client by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM clients WHERE id = ?1");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Gets a client by phone (the portal login identifier).
    pub async fn get_by_phone(&self, phone: &str) -> DbResult<Option<Client>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM clients WHERE phone = ?1");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Lists clients ordered by last name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Client>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM clients ORDER BY last_name, first_name LIMIT ?1"
        );
        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    /// Inserts a new client.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - phone already registered
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, phone = %client.phone, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, first_name, last_name, phone, email, address, city,
                id_document, portal_password_hash, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&client.id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(&client.city)
        .bind(&client.id_document)
        .bind(&client.portal_password_hash)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing client.
    pub async fn update(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "Updating client");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                first_name = ?2,
                last_name = ?3,
                phone = ?4,
                email = ?5,
                address = ?6,
                city = ?7,
                id_document = ?8,
                portal_password_hash = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(&client.city)
        .bind(&client.id_document)
        .bind(&client.portal_password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", &client.id));
        }

        Ok(())
    }

    /// Deletes a client.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while any sale
    /// references the client - recorded history is never orphaned.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Counts clients (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new client ID.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}
