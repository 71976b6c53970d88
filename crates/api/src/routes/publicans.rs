use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/publicans/:id/bans",
            get(handlers::publicans::list_banned).post(handlers::publicans::ban_gamer),
        )
        .route(
            "/api/publicans/:id/bans/:gamer_id",
            delete(handlers::publicans::unban_gamer),
        )
}
