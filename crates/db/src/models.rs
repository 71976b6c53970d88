use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use pubgames_core::models::{calendar::AvailabilityCalendar, event::Event, game::Game};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub id: Uuid,
    pub publican_id: String,
    pub game_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub num_seats: i32,
    pub available_slots: Json<AvailabilityCalendar>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGame {
    pub id: Uuid,
    pub event_id: Uuid,
    pub host_id: String,
    pub game_name: String,
    pub game_desc: String,
    pub game_type: String,
    pub slots: Vec<String>,
    pub max_players: i32,
    pub game_code: String,
    pub access_code_hash: Option<String>,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbEvent> for Event {
    type Error = eyre::Report;

    fn try_from(row: DbEvent) -> Result<Self> {
        Ok(Event {
            id: row.id,
            publican_id: row.publican_id,
            game_type: row.game_type,
            start_time: row.start_time,
            end_time: row.end_time,
            expires: row.expires,
            num_seats: u32::try_from(row.num_seats)
                .wrap_err_with(|| format!("Event {} has a negative seat count", row.id))?,
            available_slots: row.available_slots.0,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbGame> for Game {
    type Error = eyre::Report;

    fn try_from(row: DbGame) -> Result<Self> {
        Ok(Game {
            id: row.id,
            event_id: row.event_id,
            host_id: row.host_id,
            game_name: row.game_name,
            game_desc: row.game_desc,
            game_type: row.game_type,
            slots: row.slots,
            max_players: u32::try_from(row.max_players)
                .wrap_err_with(|| format!("Game {} has a negative player count", row.id))?,
            game_code: row.game_code,
            access_code_hash: row.access_code_hash,
            participants: row.participants,
            created_at: row.created_at,
        })
    }
}
