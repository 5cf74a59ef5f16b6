use chrono::NaiveDate;
use tracing::info;

use crate::{
    calendar::{schedule::TripRange, selection::DateSelection},
    error::AppError,
    models::{activity::Activity, link::Link, trip::Trip},
    services::validation::{
        parse_invites, require_range, validate_activity, validate_destination, validate_link,
    },
    state::AppState,
};

/// Validates the new-trip form, stores the trip with its owner and guests and
/// makes it the device's current trip.
pub async fn plan_trip(
    state: &AppState,
    destination: &str,
    selection: &DateSelection,
    invites: &str,
) -> Result<Trip, AppError> {
    let destination = validate_destination(destination)?;
    let range = require_range(selection)?;
    let invites = parse_invites(invites, &state.config.owner.email)?;

    let trip = state
        .store
        .create_trip(&destination, range, &state.config.owner, &invites)
        .await?;
    state.device.save_current_trip(&trip.id).await?;
    Ok(trip)
}

pub async fn reschedule_trip(
    state: &AppState,
    trip_id: &str,
    destination: &str,
    selection: &DateSelection,
) -> Result<Trip, AppError> {
    let destination = destination.trim();
    if destination.is_empty() || !selection.is_complete() {
        return Err(AppError::bad_request(
            "Fill in the destination and select the start and end dates of the trip.",
        ));
    }
    let range = require_range(selection)?;
    state.store.update_trip(trip_id, destination, range).await
}

pub async fn schedule_activity(
    state: &AppState,
    trip_id: &str,
    title: &str,
    date: Option<NaiveDate>,
    hour: &str,
) -> Result<Activity, AppError> {
    let trip = state.store.get_trip(trip_id).await?;
    let input = validate_activity(
        title,
        date,
        hour,
        TripRange::from(&trip),
        state.schedule.offset(),
    )?;
    let activity = state.store.create_activity(trip_id, &input).await?;
    info!(%trip_id, activity_id = %activity.id, "activity scheduled");
    Ok(activity)
}

pub async fn add_link(
    state: &AppState,
    trip_id: &str,
    title: &str,
    url: &str,
) -> Result<Link, AppError> {
    state.store.get_trip(trip_id).await?;
    let (title, url) = validate_link(title, url)?;
    state.store.create_link(trip_id, &title, &url).await
}
