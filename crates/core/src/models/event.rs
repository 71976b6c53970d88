use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{AvailabilityCalendar, TimeSlot};

/// The only game type publicans can currently host.
pub const SEAT_BASED: &str = "Seat Based";

fn default_game_type() -> String {
    SEAT_BASED.to_string()
}

/// A publican-defined window of hostable time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub publican_id: String,
    pub game_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    /// Seats per slot when the event was published.
    pub num_seats: u32,
    pub available_slots: AvailabilityCalendar,
    /// Bumped on every write of `available_slots`.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub publican_id: String,
    #[serde(default = "default_game_type")]
    pub game_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub num_seats: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub publican_id: String,
    pub game_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub num_seats: u32,
    pub available_slots: AvailabilityCalendar,
    /// Same content as `available_slots`, in chronological order.
    pub slots: Vec<TimeSlot>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSelectionRequest {
    pub start_slot: String,
    pub end_slot: String,
    pub party_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSelectionResponse {
    pub slots: Vec<String>,
    pub max_party_size: u32,
    pub party_size: u32,
}
