use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanRequest {
    pub gamer_id: String,
}

/// Gamers a publican keeps out of the games hosted on their events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedGamersResponse {
    pub publican_id: String,
    pub banned: Vec<String>,
}
