use crate::domain::models::{
    event::{Event, Sector, VenueTable},
    guest::Guest,
    package::Package,
    request::{GuestInvitation, ReservationRequest},
    ticket::QrEntry,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError>;
    async fn find_by_document(&self, document_number: &str) -> Result<Option<Guest>, AppError>;
    async fn update_contact(&self, guest: &Guest) -> Result<Guest, AppError>;
    /// Increments attendance by one and loyalty by `points` for every id, in
    /// one transaction.
    async fn record_attendance(&self, guest_ids: &[String], points: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Transactional check-and-insert: re-verifies that no non-rejected
    /// request holds the (event, table) pair, inserts the request with its
    /// invitations and marks the event-table booked, or fails with
    /// `TableAlreadyRequested`.
    async fn create_checked(
        &self,
        request: &ReservationRequest,
        invitations: &[GuestInvitation],
    ) -> Result<ReservationRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationRequest>, AppError>;
    async fn list(&self, event_id: Option<&str>) -> Result<Vec<ReservationRequest>, AppError>;
    async fn count_active_for_table(
        &self,
        event_id: &str,
        table_id: &str,
        excluding_request_id: Option<&str>,
    ) -> Result<i64, AppError>;
    async fn update(&self, request: &ReservationRequest) -> Result<ReservationRequest, AppError>;
    /// Wholesale replacement of the named-guest set (delete then recreate).
    async fn replace_invitations(
        &self,
        request_id: &str,
        invitations: &[GuestInvitation],
    ) -> Result<(), AppError>;
    async fn list_invitations(&self, request_id: &str) -> Result<Vec<GuestInvitation>, AppError>;
    /// Atomic table swap: re-checks availability of the new table excluding
    /// the moving request, flips both booked flags and repoints the request.
    async fn transfer_table(
        &self,
        request: &ReservationRequest,
        new_table_id: &str,
    ) -> Result<ReservationRequest, AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, entry: &QrEntry) -> Result<QrEntry, AppError>;
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;
    async fn list_by_request(&self, request_id: &str) -> Result<Vec<QrEntry>, AppError>;
    /// Discards every entry of a request. Used when an approval is rolled
    /// back after a failed issuance.
    async fn delete_by_request(&self, request_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn create_sector(&self, sector: &Sector) -> Result<Sector, AppError>;
    async fn find_sector(&self, id: &str) -> Result<Option<Sector>, AppError>;
    async fn create_table(&self, table: &VenueTable) -> Result<VenueTable, AppError>;
    async fn find_table(&self, id: &str) -> Result<Option<VenueTable>, AppError>;
    async fn add_event_table(&self, event_id: &str, table_id: &str) -> Result<(), AppError>;
    async fn is_table_in_event(&self, event_id: &str, table_id: &str) -> Result<bool, AppError>;
    async fn set_table_booked(&self, event_id: &str, table_id: &str, booked: bool) -> Result<(), AppError>;
    /// Active eligible tables with no non-rejected request for the event.
    async fn list_available_tables(&self, event_id: &str) -> Result<Vec<VenueTable>, AppError>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create(&self, package: &Package) -> Result<Package, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Package>, AppError>;
}

/// Durable storage for payment voucher payloads. Returns an opaque reference
/// stored verbatim on the request.
#[async_trait]
pub trait VoucherStorage: Send + Sync {
    async fn store(&self, request_id: &str, payload: &[u8]) -> Result<String, AppError>;
}
