use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{PubError, PubResult};

/// A booking of a contiguous run of an event's slots, hosted by one gamer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub event_id: Uuid,
    pub host_id: String,
    pub game_name: String,
    pub game_desc: String,
    pub game_type: String,
    /// Booked slot labels in chronological order.
    pub slots: Vec<String>,
    /// Seats taken from every booked slot.
    pub max_players: u32,
    pub game_code: String,
    #[serde(skip_serializing)]
    pub access_code_hash: Option<String>,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn is_private(&self) -> bool {
        self.access_code_hash.is_some()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_players as usize
    }

    pub fn has_participant(&self, gamer_id: &str) -> bool {
        self.participants.iter().any(|p| p == gamer_id)
    }

    pub fn add_participant(&mut self, gamer_id: &str) -> PubResult<()> {
        if self.has_participant(gamer_id) {
            return Err(PubError::Validation(format!(
                "{} has already joined the game",
                gamer_id
            )));
        }
        if self.is_full() {
            return Err(PubError::Validation("Game is full".to_string()));
        }

        self.participants.push(gamer_id.to_string());
        Ok(())
    }

    pub fn remove_participant(&mut self, gamer_id: &str) -> PubResult<()> {
        if gamer_id == self.host_id {
            return Err(PubError::Validation(
                "The host cannot leave their own game, cancel it instead".to_string(),
            ));
        }

        let before = self.participants.len();
        self.participants.retain(|p| p != gamer_id);
        if self.participants.len() == before {
            return Err(PubError::NotFound(format!(
                "Participant {} not found",
                gamer_id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostGameRequest {
    pub host_id: String,
    pub game_name: String,
    #[serde(default)]
    pub game_desc: String,
    pub start_slot: String,
    pub end_slot: String,
    pub party_size: u32,
    pub access_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub host_id: String,
    pub game_name: String,
    pub game_desc: String,
    pub game_type: String,
    pub slots: Vec<String>,
    pub max_players: u32,
    pub game_code: String,
    pub is_private: bool,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        let is_private = game.is_private();
        Self {
            id: game.id,
            event_id: game.event_id,
            host_id: game.host_id,
            game_name: game.game_name,
            game_desc: game.game_desc,
            game_type: game.game_type,
            slots: game.slots,
            max_players: game.max_players,
            game_code: game.game_code,
            is_private,
            participants: game.participants,
            created_at: game.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGameRequest {
    pub game_code: String,
    pub gamer_id: String,
    pub access_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveGameRequest {
    pub gamer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelGameRequest {
    pub host_id: String,
}

/// A gamer's games, split into the ones they host and the ones they joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamerGamesResponse {
    pub gamer_id: String,
    pub hosted: Vec<GameResponse>,
    pub joined: Vec<GameResponse>,
}

impl GamerGamesResponse {
    pub fn new(gamer_id: String, games: Vec<Game>) -> Self {
        let (hosted, joined): (Vec<Game>, Vec<Game>) =
            games.into_iter().partition(|game| game.host_id == gamer_id);

        Self {
            hosted: hosted.into_iter().map(GameResponse::from).collect(),
            joined: joined
                .into_iter()
                .filter(|game| game.has_participant(&gamer_id))
                .map(GameResponse::from)
                .collect(),
            gamer_id,
        }
    }
}
