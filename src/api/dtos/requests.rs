use crate::domain::models::guest::GuestData;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateRequestPayload {
    pub event_id: String,
    pub table_id: String,
    pub package_id: String,
    pub client: GuestData,
    pub guests: Option<Vec<GuestData>>,
    #[serde(default)]
    pub has_consumption: bool,
    #[serde(default)]
    pub extra_guests: i64,
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Deserialize)]
pub struct UpdateRequestPayload {
    pub client: GuestData,
    pub guests: Option<Vec<GuestData>>,
    pub has_consumption: Option<bool>,
    pub extra_guests: Option<i64>,
}

#[derive(Deserialize)]
pub struct ReviewNotesPayload {
    pub notes: String,
}

#[derive(Deserialize)]
pub struct MarkPaidPayload {
    /// Base64-encoded payment voucher, stored through the voucher port.
    pub voucher: Option<String>,
}

#[derive(Deserialize)]
pub struct TransferTablePayload {
    pub table_id: String,
}

#[derive(Deserialize)]
pub struct BulkInvitationItem {
    pub table_id: String,
    pub package_id: String,
    pub client: GuestData,
    pub guests: Option<Vec<GuestData>>,
    #[serde(default)]
    pub has_consumption: bool,
    #[serde(default)]
    pub extra_guests: i64,
}

#[derive(Deserialize)]
pub struct BulkInvitationsPayload {
    pub items: Vec<BulkInvitationItem>,
}

#[derive(Deserialize)]
pub struct ListRequestsParams {
    pub event_id: Option<String>,
}
