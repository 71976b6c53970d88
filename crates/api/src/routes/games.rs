use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/games/join", post(handlers::games::join_game))
        .route("/api/games/code/:code", get(handlers::games::get_game_by_code))
        .route("/api/games/:id", get(handlers::games::get_game))
        .route("/api/games/:id/leave", post(handlers::games::leave_game))
        .route("/api/games/:id/cancel", post(handlers::games::cancel_game))
}
