//! # Collection Log Repository
//!
//! Append-only history of collection contact attempts. Collectors log
//! the outcome of every call or visit so the next person working the
//! account sees what already happened.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use fiado_core::CollectionLog;

const LOG_COLUMNS: &str = "id, sale_id, collector_id, result, notes, next_action_date, created_at";

/// Repository for collection log operations.
#[derive(Debug, Clone)]
pub struct CollectionLogRepository {
    pool: SqlitePool,
}

impl CollectionLogRepository {
    /// Creates a new CollectionLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CollectionLogRepository { pool }
    }

    /// Appends a contact attempt to a sale's collection history.
    pub async fn insert(&self, log: &CollectionLog) -> DbResult<()> {
        debug!(sale_id = %log.sale_id, result = ?log.result, "Logging collection attempt");

        sqlx::query(
            r#"
            INSERT INTO collection_logs (
                id, sale_id, collector_id, result, notes, next_action_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&log.id)
        .bind(&log.sale_id)
        .bind(&log.collector_id)
        .bind(log.result)
        .bind(&log.notes)
        .bind(log.next_action_date)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a sale's collection history, newest first.
    pub async fn list_by_sale(&self, sale_id: &str) -> DbResult<Vec<CollectionLog>> {
        let sql =
            format!("SELECT {LOG_COLUMNS} FROM collection_logs WHERE sale_id = ?1 ORDER BY created_at DESC");
        let logs = sqlx::query_as::<_, CollectionLog>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(logs)
    }
}

/// Helper to generate a new collection log ID.
pub fn generate_collection_log_id() -> String {
    Uuid::new_v4().to_string()
}
