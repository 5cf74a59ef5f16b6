use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    calendar::schedule::{DaySchedule, ScheduleBuilder, TripRange},
    error::AppError,
    models::trip::Trip,
    services::store::TripRecords,
};

/// A trip together with its day-by-day schedule.
#[derive(Debug, Clone)]
pub struct Itinerary {
    pub trip: Trip,
    pub days: Vec<DaySchedule>,
}

pub async fn load_itinerary(
    records: &dyn TripRecords,
    builder: &ScheduleBuilder,
    trip_id: &str,
    now: DateTime<Utc>,
) -> Result<Itinerary, AppError> {
    let trip = records.find_trip(trip_id).await?.ok_or(AppError::NotFound)?;
    let activities = records.list_activities(trip_id).await?;
    let days = builder.build(TripRange::from(&trip), &activities, now);
    debug!(
        %trip_id,
        days = days.len(),
        activities = activities.len(),
        "schedule built"
    );
    Ok(Itinerary { trip, days })
}
