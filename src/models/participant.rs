use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::OwnerIdentity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: String,
    pub trip_id: String,
    pub name: Option<String>,
    pub email: String,
    pub is_invited: bool,
    pub is_confirmed: bool,
    pub is_owner: bool,
}

impl Participant {
    pub fn owner(trip_id: impl Into<String>, identity: &OwnerIdentity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.into(),
            name: Some(identity.name.clone()),
            email: identity.email.clone(),
            is_invited: false,
            is_confirmed: true,
            is_owner: true,
        }
    }

    pub fn invitee(trip_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.into(),
            name: None,
            email: email.into(),
            is_invited: true,
            is_confirmed: false,
            is_owner: false,
        }
    }

    /// Name when known, otherwise the e-mail address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
