use std::{fmt, sync::Arc};

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::weekday::{LocaleWeekdays, WeekdayFormatter};
use crate::models::{activity::Activity, trip::Trip};

/// Inclusive calendar-day interval of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripRange {
    pub starts_at: NaiveDate,
    pub ends_at: NaiveDate,
}

impl TripRange {
    pub fn new(starts_at: NaiveDate, ends_at: NaiveDate) -> Self {
        Self { starts_at, ends_at }
    }

    /// Number of calendar days covered; zero or negative for an inverted range.
    pub fn day_count(&self) -> i64 {
        (self.ends_at - self.starts_at).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.starts_at <= date && date <= self.ends_at
    }
}

impl From<&Trip> for TripRange {
    fn from(trip: &Trip) -> Self {
        Self::new(trip.starts_at, trip.ends_at)
    }
}

/// How activities sharing a day are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrder {
    /// Exactly the order the records were handed in.
    AsStored,
    /// Stable sort by occurrence; equal instants keep their stored order.
    #[default]
    Chronological,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledActivity {
    pub id: String,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
    pub is_past: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day_date: NaiveDate,
    pub day_of_week_name: String,
    pub items: Vec<ScheduledActivity>,
}

/// Buckets a trip's activities into one entry per day of the trip.
#[derive(Clone)]
pub struct ScheduleBuilder {
    offset: FixedOffset,
    order: ItemOrder,
    weekdays: Arc<dyn WeekdayFormatter>,
}

impl ScheduleBuilder {
    pub fn new(weekdays: Arc<dyn WeekdayFormatter>) -> Self {
        Self {
            offset: Utc.fix(),
            order: ItemOrder::default(),
            weekdays,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order(mut self, order: ItemOrder) -> Self {
        self.order = order;
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of an instant as seen in the planner's offset.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn build(
        &self,
        range: TripRange,
        activities: &[Activity],
        now: DateTime<Utc>,
    ) -> Vec<DaySchedule> {
        let day_count = range.day_count();
        if day_count <= 0 {
            return Vec::new();
        }

        let mut buckets: Vec<Vec<&Activity>> = vec![Vec::new(); day_count as usize];
        for activity in activities {
            let offset = (self.local_date(activity.occurs_at) - range.starts_at).num_days();
            if (0..day_count).contains(&offset) {
                buckets[offset as usize].push(activity);
            }
        }

        range
            .starts_at
            .iter_days()
            .zip(buckets)
            .map(|(day_date, mut bucket)| {
                if self.order == ItemOrder::Chronological {
                    bucket.sort_by_key(|activity| activity.occurs_at);
                }
                DaySchedule {
                    day_date,
                    day_of_week_name: self.weekdays.weekday_name(day_date),
                    items: bucket
                        .into_iter()
                        .map(|activity| ScheduledActivity {
                            id: activity.id.clone(),
                            title: activity.title.clone(),
                            occurs_at: activity.occurs_at,
                            is_past: activity.occurs_at < now,
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new(Arc::new(LocaleWeekdays::new(Locale::pt_BR)))
    }
}

impl fmt::Debug for ScheduleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleBuilder")
            .field("offset", &self.offset)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Builds a schedule in UTC with Portuguese day names and chronological order.
pub fn build_schedule(
    range: TripRange,
    activities: &[Activity],
    now: DateTime<Utc>,
) -> Vec<DaySchedule> {
    ScheduleBuilder::default().build(range, activities, now)
}
