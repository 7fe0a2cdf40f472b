use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One entry QR code. Minted exactly once by the ticketing engine; the
/// used/scanned fields are set later by the door-validation subsystem.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct QrEntry {
    pub id: String,
    pub code: String,
    pub guest_id: String,
    pub request_id: String,
    pub is_complimentary: bool,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub scanned_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl QrEntry {
    pub fn new(guest_id: String, request_id: String, code: String, is_complimentary: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code,
            guest_id,
            request_id,
            is_complimentary,
            is_used: false,
            used_at: None,
            scanned_by: None,
            created_at: Utc::now(),
        }
    }
}

/// Rendering-ready ticket row handed to the document layer.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TicketRender {
    pub code: String,
    pub holder: String,
    pub document_number: Option<String>,
    pub number: i64,
    pub total: i64,
    pub is_complimentary: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TicketBatch {
    pub request_id: String,
    pub event_name: String,
    pub table_name: String,
    pub sector_name: String,
    pub tickets: Vec<TicketRender>,
}
