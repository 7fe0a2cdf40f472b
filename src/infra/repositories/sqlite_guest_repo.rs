use crate::domain::{models::guest::Guest, ports::GuestRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteGuestRepo {
    pool: SqlitePool,
}

impl SqliteGuestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuestRepository for SqliteGuestRepo {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "INSERT INTO guests (id, name, document_number, phone, email, social_handle, attendance_count, loyalty_points, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&guest.id).bind(&guest.name).bind(&guest.document_number)
            .bind(&guest.phone).bind(&guest.email).bind(&guest.social_handle)
            .bind(guest.attendance_count).bind(guest.loyalty_points).bind(guest.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_document(&self, document_number: &str) -> Result<Option<Guest>, AppError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE document_number = ?")
            .bind(document_number).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_contact(&self, guest: &Guest) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(
            "UPDATE guests SET name = ?, phone = ?, email = ?, social_handle = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&guest.name).bind(&guest.phone).bind(&guest.email).bind(&guest.social_handle)
            .bind(&guest.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn record_attendance(&self, guest_ids: &[String], points: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for guest_id in guest_ids {
            sqlx::query(
                "UPDATE guests SET attendance_count = attendance_count + 1, loyalty_points = loyalty_points + ? WHERE id = ?"
            )
                .bind(points).bind(guest_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
