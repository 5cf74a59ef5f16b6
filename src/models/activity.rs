use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: String,
    pub trip_id: String,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(trip_id: impl Into<String>, title: impl Into<String>, occurs_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.into(),
            title: title.into(),
            occurs_at,
        }
    }
}
