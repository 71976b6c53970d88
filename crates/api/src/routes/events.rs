use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/events",
            post(handlers::events::create_event).get(handlers::events::list_events),
        )
        .route(
            "/api/events/:id",
            get(handlers::events::get_event).delete(handlers::events::delete_event),
        )
        .route(
            "/api/events/:id/selection",
            post(handlers::events::preview_selection),
        )
        .route(
            "/api/events/:id/games",
            post(handlers::games::host_game).get(handlers::events::list_event_games),
        )
}
