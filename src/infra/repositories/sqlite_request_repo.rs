use crate::domain::{
    models::request::{GuestInvitation, ReservationRequest},
    ports::RequestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub struct SqliteRequestRepo {
    pool: SqlitePool,
}

impl SqliteRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for SqliteRequestRepo {
    async fn create_checked(
        &self,
        request: &ReservationRequest,
        invitations: &[GuestInvitation],
    ) -> Result<ReservationRequest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Availability re-checked inside the transaction; the partial unique
        // index over (event_id, table_id, status != REJECTED) backs this up.
        let active = sqlx::query(
            "SELECT COUNT(*) as count FROM requests WHERE event_id = ? AND table_id = ? AND status != 'REJECTED'"
        )
            .bind(&request.event_id).bind(&request.table_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get::<i64, _>("count");

        if active > 0 {
            return Err(AppError::TableAlreadyRequested);
        }

        let created = sqlx::query_as::<_, ReservationRequest>(
            "INSERT INTO requests (id, event_id, table_id, package_id, client_guest_id, created_by, status, is_paid, is_pre_approved, pre_approved_at, approved_by, approved_at, paid_at, payment_voucher_ref, has_consumption, extra_guests, terms_accepted, manager_notes, review_duration_secs, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&request.id).bind(&request.event_id).bind(&request.table_id).bind(&request.package_id)
            .bind(&request.client_guest_id).bind(&request.created_by).bind(request.status)
            .bind(request.is_paid).bind(request.is_pre_approved).bind(request.pre_approved_at)
            .bind(&request.approved_by).bind(request.approved_at).bind(request.paid_at)
            .bind(&request.payment_voucher_ref).bind(request.has_consumption).bind(request.extra_guests)
            .bind(request.terms_accepted).bind(&request.manager_notes).bind(request.review_duration_secs)
            .bind(request.created_at).bind(request.updated_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for invitation in invitations {
            sqlx::query(
                "INSERT INTO guest_invitations (id, request_id, guest_id, created_at) VALUES (?, ?, ?, ?)"
            )
                .bind(&invitation.id).bind(&invitation.request_id).bind(&invitation.guest_id)
                .bind(invitation.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        sqlx::query("UPDATE event_tables SET is_booked = 1 WHERE event_id = ? AND table_id = ?")
            .bind(&request.event_id).bind(&request.table_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationRequest>, AppError> {
        sqlx::query_as::<_, ReservationRequest>("SELECT * FROM requests WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, event_id: Option<&str>) -> Result<Vec<ReservationRequest>, AppError> {
        match event_id {
            Some(event_id) => {
                sqlx::query_as::<_, ReservationRequest>(
                    "SELECT * FROM requests WHERE event_id = ? ORDER BY created_at ASC"
                )
                    .bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, ReservationRequest>("SELECT * FROM requests ORDER BY created_at ASC")
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn count_active_for_table(
        &self,
        event_id: &str,
        table_id: &str,
        excluding_request_id: Option<&str>,
    ) -> Result<i64, AppError> {
        let row = match excluding_request_id {
            Some(excluded) => {
                sqlx::query(
                    "SELECT COUNT(*) as count FROM requests WHERE event_id = ? AND table_id = ? AND status != 'REJECTED' AND id != ?"
                )
                    .bind(event_id).bind(table_id).bind(excluded)
                    .fetch_one(&self.pool).await.map_err(AppError::Database)?
            }
            None => {
                sqlx::query(
                    "SELECT COUNT(*) as count FROM requests WHERE event_id = ? AND table_id = ? AND status != 'REJECTED'"
                )
                    .bind(event_id).bind(table_id)
                    .fetch_one(&self.pool).await.map_err(AppError::Database)?
            }
        };
        Ok(row.get::<i64, _>("count"))
    }

    async fn update(&self, request: &ReservationRequest) -> Result<ReservationRequest, AppError> {
        sqlx::query_as::<_, ReservationRequest>(
            "UPDATE requests SET table_id=?, package_id=?, client_guest_id=?, status=?, is_paid=?, is_pre_approved=?, pre_approved_at=?, approved_by=?, approved_at=?, paid_at=?, payment_voucher_ref=?, has_consumption=?, extra_guests=?, manager_notes=?, review_duration_secs=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&request.table_id).bind(&request.package_id).bind(&request.client_guest_id)
            .bind(request.status).bind(request.is_paid).bind(request.is_pre_approved)
            .bind(request.pre_approved_at).bind(&request.approved_by).bind(request.approved_at)
            .bind(request.paid_at).bind(&request.payment_voucher_ref).bind(request.has_consumption)
            .bind(request.extra_guests).bind(&request.manager_notes).bind(request.review_duration_secs)
            .bind(request.updated_at)
            .bind(&request.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn replace_invitations(
        &self,
        request_id: &str,
        invitations: &[GuestInvitation],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM guest_invitations WHERE request_id = ?")
            .bind(request_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        for invitation in invitations {
            sqlx::query(
                "INSERT INTO guest_invitations (id, request_id, guest_id, created_at) VALUES (?, ?, ?, ?)"
            )
                .bind(&invitation.id).bind(&invitation.request_id).bind(&invitation.guest_id)
                .bind(invitation.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_invitations(&self, request_id: &str) -> Result<Vec<GuestInvitation>, AppError> {
        sqlx::query_as::<_, GuestInvitation>(
            "SELECT * FROM guest_invitations WHERE request_id = ? ORDER BY created_at ASC"
        )
            .bind(request_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn transfer_table(
        &self,
        request: &ReservationRequest,
        new_table_id: &str,
    ) -> Result<ReservationRequest, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let active = sqlx::query(
            "SELECT COUNT(*) as count FROM requests WHERE event_id = ? AND table_id = ? AND status != 'REJECTED' AND id != ?"
        )
            .bind(&request.event_id).bind(new_table_id).bind(&request.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get::<i64, _>("count");

        if active > 0 {
            return Err(AppError::TableHasActiveRequest);
        }

        let claimed = sqlx::query(
            "UPDATE event_tables SET is_booked = 1 WHERE event_id = ? AND table_id = ? AND is_booked = 0"
        )
            .bind(&request.event_id).bind(new_table_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::TableAlreadyBooked);
        }

        sqlx::query("UPDATE event_tables SET is_booked = 0 WHERE event_id = ? AND table_id = ?")
            .bind(&request.event_id).bind(&request.table_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, ReservationRequest>(
            "UPDATE requests SET table_id = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(new_table_id).bind(Utc::now()).bind(&request.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
