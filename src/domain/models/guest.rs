use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub document_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_handle: Option<String>,
    pub attendance_count: i64,
    pub loyalty_points: i64,
    pub created_at: DateTime<Utc>,
}

/// Incoming identity tuple as supplied by staff when creating or editing a
/// request. Resolved against the directory by `document_number`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GuestData {
    pub name: String,
    pub document_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub social_handle: Option<String>,
}

impl Guest {
    pub fn new(data: &GuestData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            document_number: data.document_number.clone(),
            phone: data.phone.clone(),
            email: data.email.clone(),
            social_handle: data.social_handle.clone(),
            attendance_count: 0,
            loyalty_points: 0,
            created_at: Utc::now(),
        }
    }

    /// Placeholder holder for anonymous tickets. One per event, keyed by a
    /// synthetic document string that cannot collide with a real document.
    pub fn anonymous_for_event(event_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Anonymous".to_string(),
            document_number: format!("ANON-{}", event_id),
            phone: None,
            email: None,
            social_handle: None,
            attendance_count: 0,
            loyalty_points: 0,
            created_at: Utc::now(),
        }
    }

    /// True only for the placeholder of this exact event; a real guest whose
    /// document happens to start with the synthetic prefix does not match.
    pub fn is_anonymous_for_event(&self, event_id: &str) -> bool {
        self.document_number == format!("ANON-{}", event_id)
    }

    /// Merge a later sighting into this record. Non-empty incoming fields
    /// overwrite, empty ones never clobber existing values.
    pub fn merge_contact(&mut self, data: &GuestData) {
        if !data.name.is_empty() {
            self.name = data.name.clone();
        }
        if let Some(phone) = &data.phone
            && !phone.is_empty() {
            self.phone = Some(phone.clone());
        }
        if let Some(email) = &data.email
            && !email.is_empty() {
            self.email = Some(email.clone());
        }
        if let Some(handle) = &data.social_handle
            && !handle.is_empty() {
            self.social_handle = Some(handle.clone());
        }
    }
}
