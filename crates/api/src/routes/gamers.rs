use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/gamers/:id/games",
        get(handlers::gamers::list_gamer_games),
    )
}
