use chrono::{DateTime, Locale, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::calendar::weekday::format_localized_date;

const SUMMARY_DESTINATION_LEN: usize = 14;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: String,
    pub destination: String,
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(destination: impl Into<String>, starts_at: NaiveDate, ends_at: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            destination: destination.into(),
            starts_at,
            ends_at,
            is_confirmed: false,
            created_at: Utc::now(),
        }
    }

    /// Header line for the trip page, e.g. "Florianópolis de 10 a 12 de mar.".
    pub fn summary_label(&self, locale: Locale) -> String {
        let destination = if self.destination.chars().count() > SUMMARY_DESTINATION_LEN {
            let head: String = self.destination.chars().take(SUMMARY_DESTINATION_LEN).collect();
            format!("{head}...")
        } else {
            self.destination.clone()
        };
        format!(
            "{destination} de {} a {} de {}.",
            self.starts_at.format("%d"),
            self.ends_at.format("%d"),
            format_localized_date(self.starts_at, "%b", locale)
        )
    }
}
