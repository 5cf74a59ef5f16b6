use std::sync::Arc;

use crate::{
    calendar::{schedule::ScheduleBuilder, weekday::LocaleWeekdays},
    config::AppConfig,
    db::DbPool,
    services::{storage::DeviceStorage, store::TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: TripStore,
    pub device: DeviceStorage,
    pub schedule: ScheduleBuilder,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, device: DeviceStorage) -> Self {
        let schedule = ScheduleBuilder::new(Arc::new(LocaleWeekdays::new(config.locale)))
            .with_offset(config.utc_offset)
            .with_order(config.schedule_order);
        let store = TripStore::new(db);
        Self {
            config,
            store,
            device,
            schedule,
        }
    }
}
