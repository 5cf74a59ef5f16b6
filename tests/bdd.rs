use std::{fmt, net::SocketAddr};

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Locale, NaiveDate, TimeZone, Utc};
use cucumber::{given, then, when, World as _};
use planner::{
    calendar::{
        schedule::{DaySchedule, ItemOrder, TripRange},
        selection::{select_days, DateSelection},
    },
    config::{AppConfig, OwnerIdentity},
    db::{init_pool, run_migrations},
    error::AppError,
    services::{
        itinerary::load_itinerary,
        planning::{add_link, plan_trip, reschedule_trip, schedule_activity},
        storage::DeviceStorage,
        store::TripRecords,
        validation::ActivityInput,
    },
    state::AppState,
};
use tempfile::TempDir;

#[derive(Debug, cucumber::World, Default)]
struct PlannerWorld {
    state: Option<TestState>,
    trip_id: Option<String>,
    last_error: Option<String>,
}

impl PlannerWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn trip_id(&self) -> &str {
        self.trip_id.as_deref().expect("a trip must exist first")
    }

    fn record<T>(&mut self, outcome: Result<T, AppError>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(AppError::BadRequest(message)) => {
                self.last_error = Some(message);
                None
            }
            Err(err) => panic!("unexpected failure: {err}"),
        }
    }

    async fn schedule_at(&self, now: DateTime<Utc>) -> Vec<DaySchedule> {
        let state = self.app_state();
        load_itinerary(&state.store, &state.schedule, self.trip_id(), now)
            .await
            .expect("load itinerary")
            .days
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db_path = root.path().join("bdd.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_root: root.path().join("device"),
            owner: OwnerIdentity {
                name: "Owner".into(),
                email: "owner@example.com".into(),
            },
            locale: Locale::pt_BR,
            utc_offset: FixedOffset::east_opt(0).context("utc offset")?,
            schedule_order: ItemOrder::Chronological,
        };

        let db = init_pool(&config.database_url).await?;
        run_migrations(&db).await?;

        let device = DeviceStorage::new(config.data_root.clone());
        device.ensure_structure().await?;

        let app = AppState::new(config, db, device);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

fn parse_instant(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid test instant")
        .with_timezone(&Utc)
}

fn long_ago() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

fn titles(day: &DaySchedule) -> Vec<&str> {
    day.items.iter().map(|item| item.title.as_str()).collect()
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut PlannerWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.trip_id = None;
    world.last_error = None;
}

#[given(regex = r#"^a trip to "([^"]+)" from "([^"]+)" to "([^"]+)" inviting "([^"]*)"$"#)]
async fn given_trip(world: &mut PlannerWorld, destination: String, from: String, to: String, invites: String) {
    create_trip(world, destination, from, to, invites).await;
    assert!(world.trip_id.is_some(), "trip setup failed: {:?}", world.last_error);
}

#[when(regex = r#"^I create a trip to "([^"]+)" from "([^"]+)" to "([^"]+)" inviting "([^"]*)"$"#)]
async fn when_create_trip(world: &mut PlannerWorld, destination: String, from: String, to: String, invites: String) {
    create_trip(world, destination, from, to, invites).await;
}

async fn create_trip(world: &mut PlannerWorld, destination: String, from: String, to: String, invites: String) {
    let selection = select_days(DateSelection::default(), [parse_date(&from), parse_date(&to)]);
    let outcome = plan_trip(world.app_state(), &destination, &selection, &invites).await;
    if let Some(trip) = world.record(outcome) {
        world.trip_id = Some(trip.id);
    }
}

#[when(regex = r#"^I move the trip to "([^"]+)" until "([^"]+)"$"#)]
async fn when_move_trip(world: &mut PlannerWorld, from: String, to: String) {
    let trip = world
        .app_state()
        .store
        .get_trip(world.trip_id())
        .await
        .expect("trip");
    let selection = DateSelection::between(parse_date(&from), parse_date(&to));
    let outcome = reschedule_trip(world.app_state(), &trip.id, &trip.destination, &selection).await;
    world.record(outcome);
}

#[when(regex = r#"^I schedule "([^"]+)" on "([^"]+)" at (\d+)$"#)]
async fn when_schedule(world: &mut PlannerWorld, title: String, date: String, hour: String) {
    let outcome = schedule_activity(
        world.app_state(),
        world.trip_id(),
        &title,
        Some(parse_date(&date)),
        &hour,
    )
    .await;
    world.record(outcome);
}

#[when(regex = r#"^I store an activity "([^"]+)" at "([^"]+)"$"#)]
async fn when_store_activity(world: &mut PlannerWorld, title: String, at: String) {
    let input = ActivityInput {
        title,
        occurs_at: parse_instant(&at),
    };
    world
        .app_state()
        .store
        .create_activity(world.trip_id(), &input)
        .await
        .expect("store activity");
}

#[when(regex = r#"^I add the link "([^"]+)" to "([^"]+)"$"#)]
async fn when_add_link(world: &mut PlannerWorld, title: String, url: String) {
    let outcome = add_link(world.app_state(), world.trip_id(), &title, &url).await;
    world.record(outcome);
}

#[when("I confirm every invited guest")]
async fn when_confirm_guests(world: &mut PlannerWorld) {
    let store = &world.app_state().store;
    let participants = store
        .list_participants(world.trip_id())
        .await
        .expect("participants");
    for participant in participants.iter().filter(|p| !p.is_confirmed) {
        store
            .confirm_participant(world.trip_id(), &participant.id)
            .await
            .expect("confirm participant");
    }
}

#[then(regex = r"^the trip has (\d+) participants and (\d+) owner$")]
async fn then_participants(world: &mut PlannerWorld, total: usize, owners: usize) {
    let participants = world
        .app_state()
        .store
        .list_participants(world.trip_id())
        .await
        .expect("participants");
    assert_eq!(participants.len(), total);
    assert_eq!(participants.iter().filter(|p| p.is_owner).count(), owners);
    assert!(participants[0].is_owner);
    assert!(participants[0].is_confirmed);
    assert!(participants[1..].iter().all(|p| p.is_invited && !p.is_confirmed));
}

#[then("every participant is confirmed")]
async fn then_all_confirmed(world: &mut PlannerWorld) {
    let participants = world
        .app_state()
        .store
        .list_participants(world.trip_id())
        .await
        .expect("participants");
    assert!(participants.iter().all(|p| p.is_confirmed));
}

#[then("the device remembers the trip")]
async fn then_device_remembers(world: &mut PlannerWorld) {
    let current = world
        .app_state()
        .device
        .current_trip()
        .await
        .expect("device storage");
    assert_eq!(current.as_deref(), Some(world.trip_id()));
}

#[then(regex = r#"^the trip runs from "([^"]+)" to "([^"]+)"$"#)]
async fn then_trip_runs(world: &mut PlannerWorld, from: String, to: String) {
    let trip = world
        .app_state()
        .store
        .find_trip(world.trip_id())
        .await
        .expect("find trip")
        .expect("trip exists");
    assert_eq!(
        TripRange::from(&trip),
        TripRange::new(parse_date(&from), parse_date(&to))
    );
}

#[then("the request is rejected")]
async fn then_rejected(world: &mut PlannerWorld) {
    assert!(world.last_error.is_some(), "expected a validation error");
}

#[then("no trip is stored")]
async fn then_no_trip(world: &mut PlannerWorld) {
    let trips = world.app_state().store.list_trips().await.expect("list trips");
    assert!(trips.is_empty());
    let current = world.app_state().device.current_trip().await.expect("device");
    assert_eq!(current, None);
}

#[then(regex = r"^the schedule has (\d+) days$")]
async fn then_schedule_days(world: &mut PlannerWorld, expected: usize) {
    let days = world.schedule_at(long_ago()).await;
    assert_eq!(days.len(), expected);
    for pair in days.windows(2) {
        assert_eq!(pair[0].day_date.succ_opt(), Some(pair[1].day_date));
    }
}

#[then(regex = r#"^day (\d+) lists "([^"]+)"$"#)]
async fn then_day_lists(world: &mut PlannerWorld, day: usize, expected: String) {
    let days = world.schedule_at(long_ago()).await;
    let expected: Vec<&str> = expected.split(", ").collect();
    assert_eq!(titles(&days[day - 1]), expected);
}

#[then(regex = r"^day (\d+) lists nothing$")]
async fn then_day_empty(world: &mut PlannerWorld, day: usize) {
    let days = world.schedule_at(long_ago()).await;
    assert!(days[day - 1].items.is_empty());
}

#[then("every day lists nothing")]
async fn then_every_day_empty(world: &mut PlannerWorld) {
    let days = world.schedule_at(long_ago()).await;
    assert!(days.iter().all(|day| day.items.is_empty()));
}

#[then(regex = r#"^at "([^"]+)" only "([^"]+)" is past$"#)]
async fn then_only_past(world: &mut PlannerWorld, now: String, title: String) {
    let days = world.schedule_at(parse_instant(&now)).await;
    let past: Vec<&str> = days
        .iter()
        .flat_map(|day| day.items.iter())
        .filter(|item| item.is_past)
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(past, vec![title.as_str()]);
}

#[then(regex = r"^the trip has (\d+) links$")]
async fn then_links(world: &mut PlannerWorld, expected: usize) {
    let links = world
        .app_state()
        .store
        .list_links(world.trip_id())
        .await
        .expect("links");
    assert_eq!(links.len(), expected);
}

#[tokio::main]
async fn main() {
    PlannerWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
