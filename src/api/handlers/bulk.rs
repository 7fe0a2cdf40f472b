use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{BulkInvitationItem, BulkInvitationsPayload};
use crate::api::dtos::responses::BulkInvitationsResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::Event;
use crate::domain::models::request::{GuestInvitation, NewRequestParams, RequestStatus, ReservationRequest};
use crate::domain::models::ticket::TicketBatch;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Staff-comp shortcut: every item lands directly in APPROVED with tickets
/// issued, bypassing the pre-approve/payment gate on purpose. Items are
/// processed independently; a failed item is collected and never aborts the
/// batch nor rolls back earlier successes.
pub async fn create_bulk_invitations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<BulkInvitationsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let mut succeeded = 0;
    let mut errors = Vec::new();
    let mut documents = Vec::new();

    for (idx, item) in payload.items.into_iter().enumerate() {
        match process_item(&state, &event, &user.id, item).await {
            Ok(document) => {
                succeeded += 1;
                documents.push(document);
            }
            Err(e) => {
                warn!("Bulk invitation item {} failed: {}", idx + 1, e);
                errors.push(format!("Item {}: {}", idx + 1, e));
            }
        }
    }

    info!(
        "Bulk invitations for event {}: {} succeeded, {} failed",
        event.id,
        succeeded,
        errors.len()
    );

    Ok(Json(BulkInvitationsResponse {
        succeeded,
        failed: errors.len(),
        errors,
        documents,
    }))
}

async fn process_item(
    state: &AppState,
    event: &Event,
    creator_id: &str,
    item: BulkInvitationItem,
) -> Result<TicketBatch, AppError> {
    if item.extra_guests < 0 {
        return Err(AppError::Validation("Extra guests must not be negative".into()));
    }

    let table = state.event_repo.find_table(&item.table_id).await?
        .ok_or(AppError::NotFound("Table not found".into()))?;

    if !state.event_repo.is_table_in_event(&event.id, &table.id).await? {
        return Err(AppError::Validation("Table is not configured for this event".into()));
    }

    let sector = state.event_repo.find_sector(&table.sector_id).await?
        .ok_or(AppError::NotFound("Sector not found".into()))?;
    let package = state.package_repo.find_by_id(&item.package_id).await?
        .ok_or(AppError::NotFound("Package not found".into()))?;

    if !state.availability.is_table_free(&event.id, &table.id, None).await? {
        return Err(AppError::TableAlreadyRequested);
    }

    let client = state.guest_directory.resolve(&item.client).await?;

    let mut request = ReservationRequest::new(NewRequestParams {
        event_id: event.id.clone(),
        table_id: table.id.clone(),
        package_id: package.id.clone(),
        client_guest_id: client.id.clone(),
        created_by: creator_id.to_string(),
        has_consumption: item.has_consumption,
        extra_guests: item.extra_guests,
        terms_accepted: true,
    });
    request.status = RequestStatus::Approved;
    request.is_pre_approved = true;
    request.approved_by = Some(creator_id.to_string());
    request.approved_at = Some(Utc::now());
    request.review_duration_secs = Some(0);

    let mut invitations = Vec::new();
    if sector.requires_guest_list {
        for data in item.guests.as_deref().unwrap_or_default() {
            let guest = state.guest_directory.resolve(data).await?;
            invitations.push(GuestInvitation::new(request.id.clone(), guest.id));
        }
    }

    let created = state.request_repo.create_checked(&request, &invitations).await?;

    let invitation_guest_ids: Vec<String> =
        invitations.into_iter().map(|inv| inv.guest_id).collect();

    let issued = state
        .ticketing
        .issue_for_approval(&created, event, &table, &sector, &package, &invitation_guest_ids)
        .await?;

    state.guest_directory.record_attendance(&issued.attendee_ids).await?;

    // One printable document per item; complimentary tickets ride along
    // flagged so the renderer can mark them "not for resale".
    let mut document = issued.primary;
    if let Some(complimentary) = issued.complimentary {
        document.tickets.extend(complimentary.tickets);
    }
    Ok(document)
}
