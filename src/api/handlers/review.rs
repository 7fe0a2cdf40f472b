use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{MarkPaidPayload, ReviewNotesPayload, TransferTablePayload};
use crate::api::dtos::responses::{PreApprovalResponse, TicketsResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::request::{RequestStatus, ReservationRequest};
use crate::error::AppError;
use crate::state::AppState;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn pre_approve_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if !matches!(request.status, RequestStatus::Pending | RequestStatus::Observed) {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    request.status = RequestStatus::PreApproved;
    request.is_pre_approved = true;
    request.pre_approved_at = Some(Utc::now());
    request.approved_by = Some(user.id);
    request.updated_at = Utc::now();

    let updated = state.request_repo.update(&request).await?;

    let event = state.event_repo.find_by_id(&updated.event_id).await?
        .ok_or(AppError::Internal)?;

    info!("Request {} pre-approved, awaiting payment", updated.id);
    Ok(Json(PreApprovalResponse {
        request: updated,
        payment_qr_ref: event.payment_qr_ref,
    }))
}

pub async fn mark_as_paid(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(request_id): Path<String>,
    Json(payload): Json<MarkPaidPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if request.status != RequestStatus::PreApproved {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    // Idempotent: an already-paid request is not re-marked.
    if request.is_paid {
        return Ok(Json(request));
    }

    if let Some(encoded) = payload.voucher {
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| AppError::Validation("Voucher payload is not valid base64".into()))?;
        let reference = state.voucher_storage.store(&request.id, &bytes).await?;
        request.payment_voucher_ref = Some(reference);
    }

    request.is_paid = true;
    request.paid_at = Some(Utc::now());
    request.updated_at = Utc::now();

    let updated = state.request_repo.update(&request).await?;
    info!("Request {} marked as paid", updated.id);
    Ok(Json(updated))
}

pub async fn approve_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    match request.status {
        RequestStatus::Pending | RequestStatus::Observed => {}
        // The payment gate: pre-approved requests must be settled first.
        RequestStatus::PreApproved => {
            if !request.is_paid {
                warn!("Approval of request {} blocked, not paid", request.id);
                return Err(AppError::NotPaid);
            }
        }
        _ => return Err(AppError::InvalidStatus(request.status.as_str().into())),
    }

    let event = state.event_repo.find_by_id(&request.event_id).await?
        .ok_or(AppError::Internal)?;
    let table = state.event_repo.find_table(&request.table_id).await?
        .ok_or(AppError::Internal)?;
    let sector = state.event_repo.find_sector(&table.sector_id).await?
        .ok_or(AppError::Internal)?;
    let package = state.package_repo.find_by_id(&request.package_id).await?
        .ok_or(AppError::Internal)?;

    let invitation_guest_ids: Vec<String> = state
        .request_repo
        .list_invitations(&request.id)
        .await?
        .into_iter()
        .map(|inv| inv.guest_id)
        .collect();

    let prior = request.clone();
    request.status = RequestStatus::Approved;
    request.approved_by = Some(user.id);
    request.approved_at = Some(Utc::now());
    request.review_duration_secs = Some(request.review_duration_from_now());
    request.updated_at = Utc::now();

    let updated = state.request_repo.update(&request).await?;

    // Status flip and issuance succeed or fail together; a failed issuance
    // rolls the request back to its prior reviewable state.
    let issued = match state
        .ticketing
        .issue_for_approval(&updated, &event, &table, &sector, &package, &invitation_guest_ids)
        .await
    {
        Ok(issued) => issued,
        Err(e) => {
            revert_failed_approval(&state, &prior).await;
            return Err(e);
        }
    };

    if let Err(e) = state.guest_directory.record_attendance(&issued.attendee_ids).await {
        revert_failed_approval(&state, &prior).await;
        return Err(e);
    }

    info!("Request {} approved, {} tickets issued", updated.id, issued.primary.tickets.len());
    Ok(Json(TicketsResponse {
        request: updated,
        tickets: issued.primary,
        complimentary: issued.complimentary,
    }))
}

/// Restores the pre-approval snapshot and discards any entries minted by the
/// failed issuance, so a retry starts clean.
async fn revert_failed_approval(state: &AppState, prior: &ReservationRequest) {
    if let Err(e) = state.ticket_repo.delete_by_request(&prior.id).await {
        warn!("Could not discard tickets of request {} after failed approval: {}", prior.id, e);
    }
    if let Err(e) = state.request_repo.update(prior).await {
        warn!("Could not revert request {} after failed approval: {}", prior.id, e);
    }
}

pub async fn observe_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
    Json(payload): Json<ReviewNotesPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.notes.trim().is_empty() {
        return Err(AppError::Validation("Observation notes are required".into()));
    }

    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if request.status != RequestStatus::Pending {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    request.status = RequestStatus::Observed;
    request.approved_by = Some(user.id);
    request.manager_notes = Some(payload.notes);
    request.review_duration_secs = Some(request.review_duration_from_now());
    request.updated_at = Utc::now();

    let updated = state.request_repo.update(&request).await?;
    info!("Request {} sent back for corrections", updated.id);
    Ok(Json(updated))
}

pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
    Json(payload): Json<ReviewNotesPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.notes.trim().is_empty() {
        return Err(AppError::Validation("Rejection notes are required".into()));
    }

    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if !matches!(
        request.status,
        RequestStatus::Pending | RequestStatus::Observed | RequestStatus::PreApproved
    ) {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    request.status = RequestStatus::Rejected;
    request.approved_by = Some(user.id);
    request.manager_notes = Some(payload.notes);
    request.review_duration_secs = Some(request.review_duration_from_now());
    request.updated_at = Utc::now();

    let updated = state.request_repo.update(&request).await?;
    state
        .event_repo
        .set_table_booked(&updated.event_id, &updated.table_id, false)
        .await?;

    info!("Request {} rejected", updated.id);
    Ok(Json(updated))
}

pub async fn transfer_table(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(request_id): Path<String>,
    Json(payload): Json<TransferTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if request.status.is_terminal() {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    let new_table = state.event_repo.find_table(&payload.table_id).await?
        .ok_or(AppError::NotFound("Table not found".into()))?;
    let current_table = state.event_repo.find_table(&request.table_id).await?
        .ok_or(AppError::Internal)?;

    // Packages and guest-list policy are sector-scoped, so the request may
    // not move across sectors.
    if new_table.sector_id != current_table.sector_id {
        return Err(AppError::Validation("Target table belongs to a different sector".into()));
    }

    if !state.event_repo.is_table_in_event(&request.event_id, &new_table.id).await? {
        return Err(AppError::Validation("Table is not configured for this event".into()));
    }

    if !state
        .availability
        .is_table_free(&request.event_id, &new_table.id, Some(&request.id))
        .await?
    {
        return Err(AppError::TableHasActiveRequest);
    }

    let updated = state.request_repo.transfer_table(&request, &new_table.id).await?;
    info!(
        "Request {} transferred from table {} to {}",
        updated.id, current_table.id, new_table.id
    );
    Ok(Json(updated))
}
