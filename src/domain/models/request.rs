use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Observed,
    PreApproved,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Observed => "OBSERVED",
            RequestStatus::PreApproved => "PRE_APPROVED",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReservationRequest {
    pub id: String,
    pub event_id: String,
    pub table_id: String,
    pub package_id: String,
    pub client_guest_id: String,
    pub created_by: String,
    pub status: RequestStatus,
    pub is_paid: bool,
    pub is_pre_approved: bool,
    pub pre_approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_voucher_ref: Option<String>,
    pub has_consumption: bool,
    pub extra_guests: i64,
    pub terms_accepted: bool,
    pub manager_notes: Option<String>,
    pub review_duration_secs: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewRequestParams {
    pub event_id: String,
    pub table_id: String,
    pub package_id: String,
    pub client_guest_id: String,
    pub created_by: String,
    pub has_consumption: bool,
    pub extra_guests: i64,
    pub terms_accepted: bool,
}

impl ReservationRequest {
    pub fn new(params: NewRequestParams) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            table_id: params.table_id,
            package_id: params.package_id,
            client_guest_id: params.client_guest_id,
            created_by: params.created_by,
            status: RequestStatus::Pending,
            is_paid: false,
            is_pre_approved: false,
            pre_approved_at: None,
            approved_by: None,
            approved_at: None,
            paid_at: None,
            payment_voucher_ref: None,
            has_consumption: params.has_consumption,
            extra_guests: params.extra_guests,
            terms_accepted: params.terms_accepted,
            manager_notes: None,
            review_duration_secs: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seconds elapsed between creation and the reviewing decision.
    pub fn review_duration_from_now(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct GuestInvitation {
    pub id: String,
    pub request_id: String,
    pub guest_id: String,
    pub created_at: DateTime<Utc>,
}

impl GuestInvitation {
    pub fn new(request_id: String, guest_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request_id,
            guest_id,
            created_at: Utc::now(),
        }
    }
}
