use axum::{
    Json,
    extract::{Path, State},
};
use pubgames_core::models::game::GamerGamesResponse;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// Games a gamer hosts and games they joined.
///
/// # Endpoint
///
/// ```text
/// GET /api/gamers/:id/games
/// ```
#[axum::debug_handler]
pub async fn list_gamer_games(
    State(state): State<Arc<ApiState>>,
    Path(gamer_id): Path<String>,
) -> Result<Json<GamerGamesResponse>, AppError> {
    let games = state.store.list_games_for_gamer(gamer_id.clone()).await?;
    Ok(Json(GamerGamesResponse::new(gamer_id, games)))
}
