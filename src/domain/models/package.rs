use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub included_people: i64,
    pub base_price: i64,
    pub extra_person_price: i64,
    pub is_active: bool,
}

impl Package {
    pub fn new(name: String, included_people: i64, base_price: i64, extra_person_price: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            included_people,
            base_price,
            extra_person_price,
            is_active: true,
        }
    }
}
