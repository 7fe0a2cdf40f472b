use std::sync::Arc;
use crate::domain::models::guest::{Guest, GuestData};
use crate::domain::ports::GuestRepository;
use crate::error::AppError;
use tracing::debug;

/// Loyalty points granted per attended event.
const LOYALTY_REWARD_POINTS: i64 = 10;

/// Deduplicated guest identity keyed by document number. Lookup-then-create
/// is the intended idempotent contract; the unique index on document_number
/// is the concurrency safety net.
pub struct GuestDirectory {
    guest_repo: Arc<dyn GuestRepository>,
}

impl GuestDirectory {
    pub fn new(guest_repo: Arc<dyn GuestRepository>) -> Self {
        Self { guest_repo }
    }

    pub async fn resolve(&self, data: &GuestData) -> Result<Guest, AppError> {
        if data.name.trim().is_empty() {
            return Err(AppError::Validation("Guest name is required".into()));
        }
        if data.document_number.trim().is_empty() {
            return Err(AppError::Validation("Guest document number is required".into()));
        }

        match self.guest_repo.find_by_document(&data.document_number).await? {
            Some(mut existing) => {
                existing.merge_contact(data);
                self.guest_repo.update_contact(&existing).await
            }
            None => {
                debug!("Registering new guest with document {}", data.document_number);
                self.guest_repo.create(&Guest::new(data)).await
            }
        }
    }

    /// Per-event placeholder owning anonymous tickets. Created on first use.
    pub async fn resolve_anonymous(&self, event_id: &str) -> Result<Guest, AppError> {
        let document = format!("ANON-{}", event_id);
        match self.guest_repo.find_by_document(&document).await? {
            Some(placeholder) => Ok(placeholder),
            None => self.guest_repo.create(&Guest::anonymous_for_event(event_id)).await,
        }
    }

    pub async fn record_attendance(&self, guest_ids: &[String]) -> Result<(), AppError> {
        if guest_ids.is_empty() {
            return Ok(());
        }
        self.guest_repo.record_attendance(guest_ids, LOYALTY_REWARD_POINTS).await
    }
}
