use crate::domain::models::event::VenueTable;
use crate::domain::models::request::ReservationRequest;
use crate::domain::models::ticket::TicketBatch;
use serde::Serialize;

#[derive(Serialize)]
pub struct PreApprovalResponse {
    pub request: ReservationRequest,
    /// Payment QR image reference of the event, shown to the client so they
    /// can settle the reservation.
    pub payment_qr_ref: Option<String>,
}

#[derive(Serialize)]
pub struct TicketsResponse {
    pub request: ReservationRequest,
    pub tickets: TicketBatch,
    pub complimentary: Option<TicketBatch>,
}

#[derive(Serialize)]
pub struct BulkInvitationsResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub documents: Vec<TicketBatch>,
}

#[derive(Serialize)]
pub struct AvailableTablesResponse {
    pub event_id: String,
    pub tables: Vec<VenueTable>,
}
