use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use url::Url;

use crate::{
    calendar::{schedule::TripRange, selection::DateSelection},
    error::AppError,
};

pub const MIN_DESTINATION_LEN: usize = 4;
pub const MAX_TRIP_DAYS: i64 = 366;
const MAX_HOUR: u32 = 23;

/// Trimmed destination, at least four characters long.
pub fn validate_destination(raw: &str) -> Result<String, AppError> {
    let destination = raw.trim();
    if destination.is_empty() {
        return Err(AppError::bad_request("Fill in the trip destination."));
    }
    if destination.chars().count() < MIN_DESTINATION_LEN {
        return Err(AppError::bad_request(format!(
            "Destination must have at least {MIN_DESTINATION_LEN} characters."
        )));
    }
    Ok(destination.to_string())
}

/// Complete selection no longer than [`MAX_TRIP_DAYS`].
pub fn require_range(selection: &DateSelection) -> Result<TripRange, AppError> {
    let range = selection
        .range()
        .map(|(start, end)| TripRange::new(start, end))
        .ok_or_else(|| AppError::bad_request("Select the start and end dates of the trip."))?;
    if range.day_count() > MAX_TRIP_DAYS {
        return Err(AppError::bad_request(format!(
            "A trip can last at most {MAX_TRIP_DAYS} days."
        )));
    }
    Ok(range)
}

/// `YYYY-MM-DD` form or query value; blank means not chosen.
pub fn parse_date_field(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("Invalid date: {value}"))),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Lowercased, trimmed e-mail address.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request(format!("Invalid e-mail: {email}")));
    }
    Ok(email)
}

/// Parses a free-form list of invite e-mails (comma, semicolon or whitespace
/// separated). Duplicates, and inviting the owner, are rejected.
pub fn parse_invites(raw: &str, owner_email: &str) -> Result<Vec<String>, AppError> {
    let mut invites: Vec<String> = Vec::new();
    for entry in raw
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
    {
        let email = normalize_email(entry)?;
        if email == owner_email || invites.contains(&email) {
            return Err(AppError::bad_request(format!(
                "E-mail already added: {email}"
            )));
        }
        invites.push(email);
    }
    Ok(invites)
}

pub fn validate_link(title: &str, url: &str) -> Result<(String, String), AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("Give the link a title."));
    }
    let parsed = Url::parse(url.trim()).map_err(|_| AppError::bad_request("Invalid link."))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::bad_request("Invalid link."));
    }
    Ok((title.to_string(), parsed.to_string()))
}

/// Hour typed into the activity form: one or two digits.
pub fn parse_hour(raw: &str) -> Result<u32, AppError> {
    let digits = raw.trim();
    if digits.is_empty() {
        return Err(AppError::bad_request("Fill in the activity hour."));
    }
    if digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::bad_request("Activity hour must be a number."));
    }
    let hour: u32 = digits
        .parse()
        .map_err(|_| AppError::bad_request("Activity hour must be a number."))?;
    if hour > MAX_HOUR {
        return Err(AppError::bad_request("Activity hour must be between 0 and 23."));
    }
    Ok(hour)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityInput {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// Validates the activity form: title, date and hour are all required and the
/// date has to fall inside the trip.
pub fn validate_activity(
    title: &str,
    date: Option<NaiveDate>,
    hour: &str,
    range: TripRange,
    offset: FixedOffset,
) -> Result<ActivityInput, AppError> {
    let title = title.trim();
    let Some(date) = date.filter(|_| !title.is_empty()) else {
        return Err(AppError::bad_request("Fill in every activity field."));
    };
    let hour = parse_hour(hour)?;
    if !range.contains(date) {
        return Err(AppError::bad_request(
            "Activity date must be within the trip dates.",
        ));
    }
    let occurs_at = offset
        .from_local_datetime(&date.and_hms_opt(hour, 0, 0).ok_or_else(|| {
            AppError::bad_request("Activity hour must be between 0 and 23.")
        })?)
        .single()
        .ok_or_else(|| AppError::bad_request("Ambiguous activity time."))?
        .with_timezone(&Utc);
    Ok(ActivityInput {
        title: title.to_string(),
        occurs_at,
    })
}
