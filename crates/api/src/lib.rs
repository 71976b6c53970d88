//! # PubGames API
//!
//! The web server of the PubGames booking service. Publicans publish events
//! with a number of seats, gamers host games on runs of an event's hourly
//! slots and other gamers join them by game code.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into booking engine calls and store writes,
//!   and keep banned gamers out of a publican's games
//! - **Middleware**: Access codes and error-to-status mapping
//! - **Config**: Environment configuration
//!
//! Handlers only see a [`BookingStore`], so the same router runs on
//! PostgreSQL or on the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers for events and games
pub mod handlers;
/// Access codes and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use eyre::{Result, WrapErr};
use pubgames_db::BookingStore;
use tokio::net::TcpListener;
use tower::{BoxError, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Where events, calendars and games live
    pub store: Arc<dyn BookingStore>,

    /// Attempts for one calendar change before giving up with a conflict
    pub booking_attempts: u32,
}

impl ApiState {
    pub fn new(store: Arc<dyn BookingStore>, booking_attempts: u32) -> Self {
        Self {
            store,
            booking_attempts: booking_attempts.max(1),
        }
    }
}

/// Installs the global tracing subscriber.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Events, their calendars and slot selection
        .merge(routes::events::routes())
        // Hosting, joining and cancelling games
        .merge(routes::games::routes())
        // A gamer's hosted and joined games
        .merge(routes::gamers::routes())
        // Publican ban lists
        .merge(routes::publicans::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn handle_timeout(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

/// Starts the API server on top of `store`.
///
/// # Errors
///
/// Fails when a CORS origin is not a valid header value or the listener
/// cannot bind.
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn BookingStore>) -> Result<()> {
    let state = Arc::new(ApiState::new(store, config.booking_attempts));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS value")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
