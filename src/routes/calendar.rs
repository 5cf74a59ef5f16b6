use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::selection::{
        format_range_label, marked_dates_for_range, select_day, DateSelection, MarkedDate,
    },
    error::AppError,
    services::validation::parse_date_field,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/select", get(select))
}

#[derive(Deserialize)]
struct SelectQuery {
    start: Option<String>,
    end: Option<String>,
    picked: NaiveDate,
}

#[derive(Serialize)]
struct SelectionView {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    label: String,
    marked_dates: Vec<MarkedDate>,
}

/// One tap on the date picker: the current selection comes in as query
/// parameters and the next selection goes out with its rendering hints.
async fn select(
    State(state): State<AppState>,
    Query(query): Query<SelectQuery>,
) -> Result<Json<SelectionView>, AppError> {
    let current = DateSelection {
        start_date: parse_date_field(query.start.as_deref())?,
        end_date: parse_date_field(query.end.as_deref())?,
    };
    let next = select_day(current, query.picked);
    Ok(Json(SelectionView {
        start_date: next.start_date,
        end_date: next.end_date,
        label: format_range_label(&next, state.config.locale),
        marked_dates: marked_dates_for_range(&next),
    }))
}
