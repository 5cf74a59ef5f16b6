use std::{env, net::SocketAddr, path::PathBuf};

use chrono::{FixedOffset, Locale};

use crate::{calendar::schedule::ItemOrder, error::AppError};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub data_root: PathBuf,
    pub owner: OwnerIdentity,
    pub locale: Locale,
    pub utc_offset: FixedOffset,
    pub schedule_order: ItemOrder,
}

/// The single local identity that owns every trip created on this device.
#[derive(Debug, Clone)]
pub struct OwnerIdentity {
    pub name: String,
    pub email: String,
}

impl Default for OwnerIdentity {
    fn default() -> Self {
        Self {
            name: "Owner".into(),
            email: "owner@planner.local".into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://planner.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let data_root = env::var("DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let defaults = OwnerIdentity::default();
        let owner = OwnerIdentity {
            name: env::var("OWNER_NAME").unwrap_or(defaults.name),
            email: env::var("OWNER_EMAIL")
                .map(|email| email.trim().to_lowercase())
                .unwrap_or(defaults.email),
        };

        let locale = parse_locale(&env::var("PLANNER_LOCALE").unwrap_or_else(|_| "pt_BR".into()))?;
        let utc_offset = parse_utc_offset(
            &env::var("PLANNER_UTC_OFFSET_HOURS").unwrap_or_else(|_| "0".into()),
        )?;
        let schedule_order = parse_schedule_order(
            &env::var("SCHEDULE_ORDER").unwrap_or_else(|_| "chronological".into()),
        )?;

        Ok(Self {
            database_url,
            listen_addr,
            data_root,
            owner,
            locale,
            utc_offset,
            schedule_order,
        })
    }
}

pub fn parse_locale(raw: &str) -> Result<Locale, AppError> {
    match raw.trim() {
        "pt_BR" | "pt-BR" => Ok(Locale::pt_BR),
        "en_US" | "en-US" => Ok(Locale::en_US),
        "es_ES" | "es-ES" => Ok(Locale::es_ES),
        "fr_FR" | "fr-FR" => Ok(Locale::fr_FR),
        "de_DE" | "de-DE" => Ok(Locale::de_DE),
        other => Err(AppError::Config(format!(
            "unsupported PLANNER_LOCALE: {other}"
        ))),
    }
}

pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, AppError> {
    let hours: i32 = raw
        .trim()
        .parse()
        .map_err(|err| AppError::Config(format!("invalid PLANNER_UTC_OFFSET_HOURS: {err}")))?;
    if !(-12..=14).contains(&hours) {
        return Err(AppError::Config(format!(
            "PLANNER_UTC_OFFSET_HOURS out of range: {hours}"
        )));
    }
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| AppError::Config(format!("invalid utc offset: {hours}")))
}

pub fn parse_schedule_order(raw: &str) -> Result<ItemOrder, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "chronological" => Ok(ItemOrder::Chronological),
        "stored" => Ok(ItemOrder::AsStored),
        other => Err(AppError::Config(format!("invalid SCHEDULE_ORDER: {other}"))),
    }
}
