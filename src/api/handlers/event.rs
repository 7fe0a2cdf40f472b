use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::responses::AvailableTablesResponse;
use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn get_available_tables(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let tables = state.availability.available_tables(&event.id).await?;
    Ok(Json(AvailableTablesResponse {
        event_id: event.id,
        tables,
    }))
}
