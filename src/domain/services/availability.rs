use std::sync::Arc;
use crate::domain::models::event::VenueTable;
use crate::domain::ports::{EventRepository, RequestRepository};
use crate::error::AppError;

/// Answers "is table T free for event E?" against the non-rejected request
/// set. The predicate here is advisory; the write-side repositories re-check
/// it inside their transactions.
pub struct AvailabilityChecker {
    request_repo: Arc<dyn RequestRepository>,
    event_repo: Arc<dyn EventRepository>,
}

impl AvailabilityChecker {
    pub fn new(request_repo: Arc<dyn RequestRepository>, event_repo: Arc<dyn EventRepository>) -> Self {
        Self { request_repo, event_repo }
    }

    pub async fn is_table_free(
        &self,
        event_id: &str,
        table_id: &str,
        excluding_request_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let active = self
            .request_repo
            .count_active_for_table(event_id, table_id, excluding_request_id)
            .await?;
        Ok(active == 0)
    }

    pub async fn available_tables(&self, event_id: &str) -> Result<Vec<VenueTable>, AppError> {
        self.event_repo.list_available_tables(event_id).await
    }
}
