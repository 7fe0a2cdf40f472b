use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub event_date: NaiveDate,
    pub visible_from: DateTime<Utc>,
    pub visible_until: DateTime<Utc>,
    pub is_active: bool,
    pub free_invitation_qr_count: i64,
    pub payment_qr_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub name: String,
    pub event_date: NaiveDate,
    pub visible_from: DateTime<Utc>,
    pub visible_until: DateTime<Utc>,
    pub free_invitation_qr_count: i64,
    pub payment_qr_ref: Option<String>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            event_date: params.event_date,
            visible_from: params.visible_from,
            visible_until: params.visible_until,
            is_active: true,
            free_invitation_qr_count: params.free_invitation_qr_count,
            payment_qr_ref: params.payment_qr_ref,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Sector {
    pub id: String,
    pub name: String,
    pub requires_guest_list: bool,
    pub is_active: bool,
}

impl Sector {
    pub fn new(name: String, requires_guest_list: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            requires_guest_list,
            is_active: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VenueTable {
    pub id: String,
    pub sector_id: String,
    pub name: String,
    pub capacity: i64,
    pub table_type: String,
    pub is_active: bool,
}

impl VenueTable {
    pub fn new(sector_id: String, name: String, capacity: i64, table_type: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sector_id,
            name,
            capacity,
            table_type,
            is_active: true,
        }
    }
}

/// Tables eligible for an event. `is_booked` is transfer bookkeeping only;
/// availability is always decided against the request statuses.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventTable {
    pub event_id: String,
    pub table_id: String,
    pub is_booked: bool,
}
