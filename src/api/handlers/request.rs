use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateRequestPayload, ListRequestsParams, UpdateRequestPayload};
use crate::api::dtos::responses::TicketsResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::{Event, Sector, VenueTable};
use crate::domain::models::guest::GuestData;
use crate::domain::models::request::{GuestInvitation, NewRequestParams, RequestStatus, ReservationRequest};
use crate::domain::models::ticket::{QrEntry, TicketBatch, TicketRender};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn create_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !payload.terms_accepted {
        return Err(AppError::TermsNotAccepted);
    }
    if payload.extra_guests < 0 {
        return Err(AppError::Validation("Extra guests must not be negative".into()));
    }

    let event = state.event_repo.find_by_id(&payload.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    let table = state.event_repo.find_table(&payload.table_id).await?
        .ok_or(AppError::NotFound("Table not found".into()))?;

    if !state.event_repo.is_table_in_event(&event.id, &table.id).await? {
        return Err(AppError::Validation("Table is not configured for this event".into()));
    }

    let sector = state.event_repo.find_sector(&table.sector_id).await?
        .ok_or(AppError::NotFound("Sector not found".into()))?;
    state.package_repo.find_by_id(&payload.package_id).await?
        .ok_or(AppError::NotFound("Package not found".into()))?;

    if !state.availability.is_table_free(&event.id, &table.id, None).await? {
        return Err(AppError::TableAlreadyRequested);
    }

    let client = state.guest_directory.resolve(&payload.client).await?;

    let request = ReservationRequest::new(NewRequestParams {
        event_id: event.id.clone(),
        table_id: table.id.clone(),
        package_id: payload.package_id,
        client_guest_id: client.id.clone(),
        created_by: user.id,
        has_consumption: payload.has_consumption,
        extra_guests: payload.extra_guests,
        terms_accepted: payload.terms_accepted,
    });

    let invitations = if sector.requires_guest_list {
        resolve_invitations(&state, &request.id, payload.guests.as_deref().unwrap_or_default()).await?
    } else {
        Vec::new()
    };

    let created = state.request_repo.create_checked(&request, &invitations).await?;
    info!("Request {} created for event {} table {}", created.id, event.id, table.id);
    Ok(Json(created))
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Query<ListRequestsParams>,
) -> Result<impl IntoResponse, AppError> {
    let requests = state.request_repo.list(params.event_id.as_deref()).await?;
    Ok(Json(requests))
}

pub async fn get_request(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;
    Ok(Json(request))
}

pub async fn update_request(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if !matches!(request.status, RequestStatus::Pending | RequestStatus::Observed) {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    let client = state.guest_directory.resolve(&payload.client).await?;
    request.client_guest_id = client.id;

    if let Some(has_consumption) = payload.has_consumption {
        request.has_consumption = has_consumption;
    }
    if let Some(extra_guests) = payload.extra_guests {
        if extra_guests < 0 {
            return Err(AppError::Validation("Extra guests must not be negative".into()));
        }
        request.extra_guests = extra_guests;
    }
    request.updated_at = Utc::now();

    let table = state.event_repo.find_table(&request.table_id).await?
        .ok_or(AppError::Internal)?;
    let sector = state.event_repo.find_sector(&table.sector_id).await?
        .ok_or(AppError::Internal)?;

    // Guest-list sectors replace the invitation set wholesale, not diffed.
    if sector.requires_guest_list {
        let invitations =
            resolve_invitations(&state, &request.id, payload.guests.as_deref().unwrap_or_default()).await?;
        state.request_repo.replace_invitations(&request.id, &invitations).await?;
    }

    let updated = state.request_repo.update(&request).await?;
    info!("Request {} updated", updated.id);
    Ok(Json(updated))
}

/// Read path: re-reads the already-issued QR entries. Never mints codes.
pub async fn download_request_tickets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Request not found".into()))?;

    if request.status != RequestStatus::Approved {
        return Err(AppError::InvalidStatus(request.status.as_str().into()));
    }

    let event = state.event_repo.find_by_id(&request.event_id).await?
        .ok_or(AppError::Internal)?;
    let table = state.event_repo.find_table(&request.table_id).await?
        .ok_or(AppError::Internal)?;
    let sector = state.event_repo.find_sector(&table.sector_id).await?
        .ok_or(AppError::Internal)?;

    let entries = state.ticket_repo.list_by_request(&request.id).await?;
    let (complimentary_entries, primary_entries): (Vec<QrEntry>, Vec<QrEntry>) =
        entries.into_iter().partition(|e| e.is_complimentary);

    let tickets = render_batch(&state, &request, &event, &table, &sector, primary_entries).await?;
    let complimentary = if complimentary_entries.is_empty() {
        None
    } else {
        Some(render_batch(&state, &request, &event, &table, &sector, complimentary_entries).await?)
    };

    Ok(Json(TicketsResponse { request, tickets, complimentary }))
}

async fn resolve_invitations(
    state: &AppState,
    request_id: &str,
    guests: &[GuestData],
) -> Result<Vec<GuestInvitation>, AppError> {
    let mut invitations = Vec::with_capacity(guests.len());
    for data in guests {
        let guest = state.guest_directory.resolve(data).await?;
        invitations.push(GuestInvitation::new(request_id.to_string(), guest.id));
    }
    Ok(invitations)
}

async fn render_batch(
    state: &AppState,
    request: &ReservationRequest,
    event: &Event,
    table: &VenueTable,
    sector: &Sector,
    entries: Vec<QrEntry>,
) -> Result<TicketBatch, AppError> {
    let total = entries.len() as i64;
    let mut batch = TicketBatch {
        request_id: request.id.clone(),
        event_name: event.name.clone(),
        table_name: table.name.clone(),
        sector_name: sector.name.clone(),
        tickets: Vec::with_capacity(entries.len()),
    };

    for (idx, entry) in entries.iter().enumerate() {
        let guest = state.guest_repo.find_by_id(&entry.guest_id).await?
            .ok_or(AppError::Internal)?;
        let number = idx as i64 + 1;

        let (holder, document_number) = if guest.is_anonymous_for_event(&event.id) {
            (format!("Anonymous #{} of {}", number, total), None)
        } else {
            (guest.name.clone(), Some(guest.document_number.clone()))
        };

        batch.tickets.push(TicketRender {
            code: entry.code.clone(),
            holder,
            document_number,
            number,
            total,
            is_complimentary: entry.is_complimentary,
        });
    }

    Ok(batch)
}
