use crate::domain::{models::ticket::QrEntry, ports::TicketRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteTicketRepo {
    pool: SqlitePool,
}

impl SqliteTicketRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepo {
    async fn create(&self, entry: &QrEntry) -> Result<QrEntry, AppError> {
        sqlx::query_as::<_, QrEntry>(
            "INSERT INTO qr_entries (id, code, guest_id, request_id, is_complimentary, is_used, used_at, scanned_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&entry.id).bind(&entry.code).bind(&entry.guest_id).bind(&entry.request_id)
            .bind(entry.is_complimentary).bind(entry.is_used).bind(entry.used_at)
            .bind(&entry.scanned_by).bind(entry.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM qr_entries WHERE code = ?")
            .bind(code)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn list_by_request(&self, request_id: &str) -> Result<Vec<QrEntry>, AppError> {
        sqlx::query_as::<_, QrEntry>(
            "SELECT * FROM qr_entries WHERE request_id = ? ORDER BY created_at ASC, id ASC"
        )
            .bind(request_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_by_request(&self, request_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM qr_entries WHERE request_id = ?")
            .bind(request_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
