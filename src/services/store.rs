use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    calendar::schedule::TripRange,
    config::OwnerIdentity,
    db::DbPool,
    error::AppError,
    models::{activity::Activity, link::Link, participant::Participant, trip::Trip},
    services::validation::ActivityInput,
};

const TRIP_COLUMNS: &str = "id, destination, starts_at, ends_at, is_confirmed, created_at";
const PARTICIPANT_COLUMNS: &str = "id, trip_id, name, email, is_invited, is_confirmed, is_owner";

/// Read side the schedule needs: a trip by id and the trip's activities.
#[async_trait]
pub trait TripRecords: Send + Sync {
    async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError>;
    async fn list_activities(&self, trip_id: &str) -> Result<Vec<Activity>, AppError>;
}

/// SQLite-backed store for trips, participants, activities and links.
#[derive(Clone)]
pub struct TripStore {
    pool: DbPool,
}

impl TripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts the trip, its owner and one participant per invite atomically.
    pub async fn create_trip(
        &self,
        destination: &str,
        range: TripRange,
        owner: &OwnerIdentity,
        invites: &[String],
    ) -> Result<Trip, AppError> {
        let trip = Trip::new(destination, range.starts_at, range.ends_at);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&trip.id)
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await?;

        let participants = std::iter::once(Participant::owner(&trip.id, owner))
            .chain(invites.iter().map(|email| Participant::invitee(&trip.id, email)));
        for participant in participants {
            insert_participant(&mut tx, &participant).await?;
        }

        tx.commit().await?;
        info!(trip_id = %trip.id, invites = invites.len(), "trip created");
        Ok(trip)
    }

    pub async fn get_trip(&self, trip_id: &str) -> Result<Trip, AppError> {
        self.find_trip(trip_id).await?.ok_or(AppError::NotFound)
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips ORDER BY starts_at, created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    pub async fn update_trip(
        &self,
        trip_id: &str,
        destination: &str,
        range: TripRange,
    ) -> Result<Trip, AppError> {
        let result =
            sqlx::query("UPDATE trips SET destination = ?1, starts_at = ?2, ends_at = ?3 WHERE id = ?4")
                .bind(destination)
                .bind(range.starts_at)
                .bind(range.ends_at)
                .bind(trip_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        info!(%trip_id, "trip updated");
        self.get_trip(trip_id).await
    }

    pub async fn list_participants(&self, trip_id: &str) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE trip_id = ?1 ORDER BY is_owner DESC, rowid"
        ))
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(participants)
    }

    pub async fn confirm_participant(
        &self,
        trip_id: &str,
        participant_id: &str,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE participants SET is_confirmed = 1 WHERE id = ?1 AND trip_id = ?2")
                .bind(participant_id)
                .bind(trip_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        debug!(%trip_id, %participant_id, "participant confirmed");
        Ok(())
    }

    pub async fn create_activity(
        &self,
        trip_id: &str,
        input: &ActivityInput,
    ) -> Result<Activity, AppError> {
        let activity = Activity::new(trip_id, &input.title, input.occurs_at);
        sqlx::query("INSERT INTO activities (id, trip_id, title, occurs_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&activity.id)
            .bind(&activity.trip_id)
            .bind(&activity.title)
            .bind(activity.occurs_at)
            .execute(&self.pool)
            .await?;
        debug!(%trip_id, activity_id = %activity.id, "activity created");
        Ok(activity)
    }

    /// Adds a link; a URL already stored (for any trip) is rejected.
    pub async fn create_link(&self, trip_id: &str, title: &str, url: &str) -> Result<Link, AppError> {
        let link = Link::new(trip_id, title, url);
        let inserted = sqlx::query("INSERT INTO links (id, trip_id, title, url) VALUES (?1, ?2, ?3, ?4)")
            .bind(&link.id)
            .bind(&link.trip_id)
            .bind(&link.title)
            .bind(&link.url)
            .execute(&self.pool)
            .await;
        match inserted {
            Ok(_) => {
                debug!(%trip_id, link_id = %link.id, "link created");
                Ok(link)
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Err(
                AppError::bad_request(format!("Link already registered: {url}")),
            ),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list_links(&self, trip_id: &str) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT id, trip_id, title, url FROM links WHERE trip_id = ?1 ORDER BY rowid",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }
}

#[async_trait]
impl TripRecords for TripStore {
    async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"))
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(trip)
    }

    /// Activities in insertion order.
    async fn list_activities(&self, trip_id: &str) -> Result<Vec<Activity>, AppError> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT id, trip_id, title, occurs_at FROM activities WHERE trip_id = ?1 ORDER BY rowid",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }
}

async fn insert_participant(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    participant: &Participant,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO participants (id, trip_id, name, email, is_invited, is_confirmed, is_owner) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&participant.id)
    .bind(&participant.trip_id)
    .bind(&participant.name)
    .bind(&participant.email)
    .bind(participant.is_invited)
    .bind(participant.is_confirmed)
    .bind(participant.is_owner)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
