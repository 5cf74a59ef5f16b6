use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::{
    calendar::{
        schedule::DaySchedule,
        selection::{format_range_label, select_days, DateSelection},
    },
    error::AppError,
    services::{
        itinerary::load_itinerary,
        planning::{add_link, plan_trip, reschedule_trip, schedule_activity},
        store::TripRecords,
        validation::parse_date_field,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/forget", post(forget_current_trip))
        .route("/trips", post(create_trip))
        .route("/trips/:id", get(trip_page).post(update_trip))
        .route("/trips/:id/schedule", get(trip_schedule))
        .route("/trips/:id/activities", post(create_activity))
        .route("/trips/:id/links", post(create_link))
        .route(
            "/trips/:id/participants/:participant_id/confirm",
            post(confirm_participant),
        )
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    error: Option<String>,
    destination: String,
    starts_at: String,
    ends_at: String,
    invites: String,
}

async fn landing(State(state): State<AppState>) -> Result<Response, AppError> {
    if let Some(trip_id) = state.device.current_trip().await? {
        if state.store.find_trip(&trip_id).await?.is_some() {
            return Ok(Redirect::to(&format!("/trips/{trip_id}")).into_response());
        }
        warn!(%trip_id, "remembered trip no longer exists");
        state.device.clear_current_trip().await?;
    }
    Ok(AskamaTemplateResponse::into_response(LandingTemplate {
        error: None,
        destination: String::new(),
        starts_at: String::new(),
        ends_at: String::new(),
        invites: String::new(),
    }))
}

async fn forget_current_trip(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.device.clear_current_trip().await?;
    Ok(Redirect::to("/"))
}

#[derive(Deserialize)]
struct NewTripForm {
    destination: String,
    starts_at: Option<String>,
    ends_at: Option<String>,
    invites: Option<String>,
}

async fn create_trip(
    State(state): State<AppState>,
    Form(form): Form<NewTripForm>,
) -> Result<Response, AppError> {
    let invites = form.invites.clone().unwrap_or_default();
    let planned = match submitted_range(form.starts_at.as_deref(), form.ends_at.as_deref()) {
        Ok(selection) => plan_trip(&state, &form.destination, &selection, &invites).await,
        Err(err) => Err(err),
    };

    match planned {
        Ok(trip) => Ok(Redirect::to(&format!("/trips/{}", trip.id)).into_response()),
        Err(AppError::BadRequest(message)) => Ok((
            StatusCode::BAD_REQUEST,
            AskamaTemplateResponse::into_response(LandingTemplate {
                error: Some(message),
                destination: form.destination,
                starts_at: form.starts_at.unwrap_or_default(),
                ends_at: form.ends_at.unwrap_or_default(),
                invites,
            }),
        )
            .into_response()),
        Err(err) => Err(err),
    }
}

struct DayView {
    day_number: u32,
    day_name: String,
    date: String,
    activities: Vec<ActivityView>,
}

struct ActivityView {
    title: String,
    hour: String,
    is_past: bool,
}

struct LinkView {
    title: String,
    url: String,
}

struct ParticipantView {
    id: String,
    name: String,
    email: String,
    is_confirmed: bool,
    is_owner: bool,
}

#[derive(Template)]
#[template(path = "trip.html")]
struct TripTemplate {
    trip_id: String,
    summary: String,
    destination: String,
    starts_at: String,
    ends_at: String,
    range_label: String,
    days: Vec<DayView>,
    links: Vec<LinkView>,
    participants: Vec<ParticipantView>,
    error: Option<String>,
}

async fn render_trip(
    state: &AppState,
    trip_id: &str,
    error: Option<String>,
) -> Result<TripTemplate, AppError> {
    let itinerary = load_itinerary(&state.store, &state.schedule, trip_id, Utc::now()).await?;
    let links = state.store.list_links(trip_id).await?;
    let participants = state.store.list_participants(trip_id).await?;
    let trip = itinerary.trip;
    let offset = state.schedule.offset();
    let selection = DateSelection::between(trip.starts_at, trip.ends_at);

    let days = itinerary
        .days
        .into_iter()
        .map(|day| DayView {
            day_number: day.day_date.day(),
            day_name: day.day_of_week_name,
            date: day.day_date.to_string(),
            activities: day
                .items
                .into_iter()
                .map(|item| ActivityView {
                    title: item.title,
                    hour: item.occurs_at.with_timezone(&offset).format("%H:%Mh").to_string(),
                    is_past: item.is_past,
                })
                .collect(),
        })
        .collect();

    Ok(TripTemplate {
        trip_id: trip.id.clone(),
        summary: trip.summary_label(state.config.locale),
        destination: trip.destination.clone(),
        starts_at: trip.starts_at.to_string(),
        ends_at: trip.ends_at.to_string(),
        range_label: format_range_label(&selection, state.config.locale),
        days,
        links: links
            .into_iter()
            .map(|link| LinkView {
                title: link.title,
                url: link.url,
            })
            .collect(),
        participants: participants
            .into_iter()
            .map(|participant| ParticipantView {
                name: participant.display_name().to_string(),
                id: participant.id,
                email: participant.email,
                is_confirmed: participant.is_confirmed,
                is_owner: participant.is_owner,
            })
            .collect(),
        error,
    })
}

async fn trip_page(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let page = render_trip(&state, &trip_id, None).await?;
    Ok(AskamaTemplateResponse::into_response(page))
}

async fn trip_schedule(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<DaySchedule>>, AppError> {
    let itinerary = load_itinerary(&state.store, &state.schedule, &trip_id, Utc::now()).await?;
    Ok(Json(itinerary.days))
}

/// Redirects back to the trip on success; validation failures re-render the
/// trip page with the message.
async fn after_submit<T>(
    state: &AppState,
    trip_id: &str,
    outcome: Result<T, AppError>,
) -> Result<Response, AppError> {
    match outcome {
        Ok(_) => Ok(Redirect::to(&format!("/trips/{trip_id}")).into_response()),
        Err(AppError::BadRequest(message)) => {
            let page = render_trip(state, trip_id, Some(message)).await?;
            Ok((
                StatusCode::BAD_REQUEST,
                AskamaTemplateResponse::into_response(page),
            )
                .into_response())
        }
        Err(err) => Err(err),
    }
}

#[derive(Deserialize)]
struct UpdateTripForm {
    destination: String,
    starts_at: Option<String>,
    ends_at: Option<String>,
}

async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<UpdateTripForm>,
) -> Result<Response, AppError> {
    state.store.get_trip(&trip_id).await?;
    let outcome = match submitted_range(form.starts_at.as_deref(), form.ends_at.as_deref()) {
        Ok(selection) => reschedule_trip(&state, &trip_id, &form.destination, &selection).await,
        Err(err) => Err(err),
    };
    after_submit(&state, &trip_id, outcome).await
}

#[derive(Deserialize)]
struct ActivityForm {
    title: String,
    date: Option<String>,
    hour: String,
}

async fn create_activity(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<ActivityForm>,
) -> Result<Response, AppError> {
    state.store.get_trip(&trip_id).await?;
    let outcome = match parse_date_field(form.date.as_deref()) {
        Ok(date) => schedule_activity(&state, &trip_id, &form.title, date, &form.hour).await,
        Err(err) => Err(err),
    };
    after_submit(&state, &trip_id, outcome).await
}

#[derive(Deserialize)]
struct LinkForm {
    title: String,
    url: String,
}

async fn create_link(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<LinkForm>,
) -> Result<Response, AppError> {
    state.store.get_trip(&trip_id).await?;
    let outcome = add_link(&state, &trip_id, &form.title, &form.url).await;
    after_submit(&state, &trip_id, outcome).await
}

async fn confirm_participant(
    State(state): State<AppState>,
    Path((trip_id, participant_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    state
        .store
        .confirm_participant(&trip_id, &participant_id)
        .await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

/// Replays the submitted dates as calendar picks so the range comes out
/// ordered whichever field holds the earlier day.
fn submitted_range(starts_at: Option<&str>, ends_at: Option<&str>) -> Result<DateSelection, AppError> {
    let picks = [parse_date_field(starts_at)?, parse_date_field(ends_at)?];
    Ok(select_days(DateSelection::default(), picks.into_iter().flatten()))
}
