use crate::domain::{
    models::event::{Event, Sector, VenueTable},
    ports::EventRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, name, event_date, visible_from, visible_until, is_active, free_invitation_qr_count, payment_qr_ref, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.name).bind(event.event_date)
            .bind(event.visible_from).bind(event.visible_until).bind(event.is_active)
            .bind(event.free_invitation_qr_count).bind(&event.payment_qr_ref).bind(event.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_sector(&self, sector: &Sector) -> Result<Sector, AppError> {
        sqlx::query_as::<_, Sector>(
            "INSERT INTO sectors (id, name, requires_guest_list, is_active) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&sector.id).bind(&sector.name).bind(sector.requires_guest_list).bind(sector.is_active)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_sector(&self, id: &str) -> Result<Option<Sector>, AppError> {
        sqlx::query_as::<_, Sector>("SELECT * FROM sectors WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_table(&self, table: &VenueTable) -> Result<VenueTable, AppError> {
        sqlx::query_as::<_, VenueTable>(
            "INSERT INTO venue_tables (id, sector_id, name, capacity, table_type, is_active)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&table.id).bind(&table.sector_id).bind(&table.name)
            .bind(table.capacity).bind(&table.table_type).bind(table.is_active)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_table(&self, id: &str) -> Result<Option<VenueTable>, AppError> {
        sqlx::query_as::<_, VenueTable>("SELECT * FROM venue_tables WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn add_event_table(&self, event_id: &str, table_id: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO event_tables (event_id, table_id, is_booked) VALUES (?, ?, 0)")
            .bind(event_id).bind(table_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn is_table_in_event(&self, event_id: &str, table_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM event_tables WHERE event_id = ? AND table_id = ?"
        )
            .bind(event_id).bind(table_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn set_table_booked(&self, event_id: &str, table_id: &str, booked: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE event_tables SET is_booked = ? WHERE event_id = ? AND table_id = ?")
            .bind(booked).bind(event_id).bind(table_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_available_tables(&self, event_id: &str) -> Result<Vec<VenueTable>, AppError> {
        sqlx::query_as::<_, VenueTable>(
            "SELECT t.* FROM venue_tables t
             JOIN event_tables et ON et.table_id = t.id
             WHERE et.event_id = ? AND t.is_active = 1
               AND NOT EXISTS (
                   SELECT 1 FROM requests r
                   WHERE r.event_id = et.event_id AND r.table_id = t.id AND r.status != 'REJECTED'
               )
             ORDER BY t.name ASC"
        )
            .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
