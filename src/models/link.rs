use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: String,
    pub trip_id: String,
    pub title: String,
    pub url: String,
}

impl Link {
    pub fn new(trip_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}
