//! # Game Handlers
//!
//! Hosting a game books a contiguous run of an event's slots for the whole
//! party, cancelling it gives the seats back. Both go through
//! [`modify_calendar`], so the engine step always runs against the calendar
//! version the store will accept, and a booking that races another one is
//! re-validated against the newer calendar instead of overwriting it.
//!
//! Joining and leaving only change a game's participant list; the seats were
//! taken from the calendar when the game was hosted. Each is one conditional
//! store write, so concurrent joins never overwrite each other.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use pubgames_core::{
    booking::BookingRequest,
    errors::{PubError, PubResult},
    models::{
        event::EventResponse,
        game::{CancelGameRequest, Game, GameResponse, HostGameRequest, JoinGameRequest, LeaveGameRequest},
    },
    selection::SlotSelection,
};
use pubgames_db::{CalendarChange, MembershipChange, modify_calendar};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::{
        events::{event_response, load_event},
        publicans::ensure_not_banned,
    },
    middleware::{auth, error_handling::AppError},
};

async fn load_game(state: &ApiState, id: Uuid) -> PubResult<Game> {
    state
        .store
        .get_game(id)
        .await?
        .ok_or_else(|| PubError::NotFound(format!("Game with ID {} not found", id)))
}

/// Unwraps a participant write. A refused write is explained by replaying
/// `rule` on the game as stored; if the rule now passes, the game changed
/// in between and the caller should retry.
fn membership_result(
    change: MembershipChange,
    id: Uuid,
    rule: impl FnOnce(&mut Game) -> PubResult<()>,
) -> PubResult<Game> {
    match change {
        MembershipChange::Updated(game) => Ok(game),
        MembershipChange::Refused(None) => Err(PubError::NotFound(format!(
            "Game with ID {} not found",
            id
        ))),
        MembershipChange::Refused(Some(mut game)) => {
            rule(&mut game)?;
            Err(PubError::Conflict(format!(
                "Participants of game {} changed, please try again",
                id
            )))
        }
    }
}

/// Hosts a game on a run of an event's slots.
///
/// # Endpoint
///
/// ```text
/// POST /api/events/:id/games
/// ```
///
/// # Errors
///
/// * `PubError::Validation` - missing host id or game name
/// * `PubError::NotFound` - the event does not exist
/// * `PubError::Authorization` - the host is banned by the event's publican
/// * `PubError::Booking` - unknown slot, zero party size or not enough seats
/// * `PubError::Conflict` - the calendar kept changing underneath the booking
#[axum::debug_handler]
pub async fn host_game(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<HostGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    if payload.host_id.trim().is_empty() {
        return Err(AppError(PubError::Validation(
            "host_id must not be empty".to_string(),
        )));
    }
    if payload.game_name.trim().is_empty() {
        return Err(AppError(PubError::Validation(
            "game_name must not be empty".to_string(),
        )));
    }

    let event = load_event(&state, event_id).await?;
    ensure_not_banned(&state, &event.publican_id, &payload.host_id).await?;

    let access_code_hash = match payload.access_code.as_deref().filter(|code| !code.is_empty()) {
        Some(code) => Some(auth::hash_access_code(code)?),
        None => None,
    };
    let game_id = Uuid::new_v4();
    let game_code = auth::generate_game_code();
    let created_at = Utc::now();

    let (event, (game, mut selection)) = modify_calendar(
        state.store.as_ref(),
        event_id,
        state.booking_attempts,
        |event| {
            let calendar = &event.available_slots;

            let mut selection = SlotSelection::new();
            let request = selection.select_range(calendar, &payload.start_slot, &payload.end_slot)?;
            selection.set_party_size(payload.party_size)?;
            selection.validate(calendar)?;
            let booked = selection.booked_calendar(calendar)?;

            let game = Game {
                id: game_id,
                event_id,
                host_id: payload.host_id.clone(),
                game_name: payload.game_name.clone(),
                game_desc: payload.game_desc.clone(),
                game_type: event.game_type.clone(),
                slots: request.selected_slot_labels,
                max_players: payload.party_size,
                game_code: game_code.clone(),
                access_code_hash: access_code_hash.clone(),
                participants: vec![payload.host_id.clone()],
                created_at,
            };

            Ok((booked, CalendarChange::Host(game.clone()), (game, selection)))
        },
    )
    .await?;
    selection.commit()?;

    info!(
        "Game {} hosted by {} on event {} ({:?}, {} seats), calendar now at version {}",
        game.id, game.host_id, event.id, game.slots, game.max_players, event.version
    );

    Ok((StatusCode::CREATED, Json(GameResponse::from(game))))
}

#[axum::debug_handler]
pub async fn get_game(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(load_game(&state, id).await?.into()))
}

#[axum::debug_handler]
pub async fn get_game_by_code(
    State(state): State<Arc<ApiState>>,
    Path(code): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game = state
        .store
        .get_game_by_code(code.to_ascii_uppercase())
        .await?
        .ok_or_else(|| PubError::NotFound(format!("Game with code {} not found", code)))?;

    Ok(Json(game.into()))
}

/// Cancels a game and gives its seats back to the event's calendar.
///
/// Only the host may cancel. Released slots never exceed the event's
/// original seat count, and because the game record is deleted in the same
/// write a game can only be released once.
///
/// # Endpoint
///
/// ```text
/// POST /api/games/:id/cancel
/// ```
#[axum::debug_handler]
pub async fn cancel_game(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelGameRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let game = load_game(&state, id).await?;
    if game.host_id != payload.host_id {
        return Err(AppError(PubError::Authorization(
            "Only the host can cancel a game".to_string(),
        )));
    }

    let booking = BookingRequest {
        selected_slot_labels: game.slots.clone(),
        party_size: game.max_players,
    };

    let (event, ()) = modify_calendar(
        state.store.as_ref(),
        game.event_id,
        state.booking_attempts,
        |event| {
            let released = booking.release(&event.available_slots).clamped(event.num_seats);
            Ok((released, CalendarChange::Cancel(game.id), ()))
        },
    )
    .await?;

    info!(
        "Game {} cancelled, released {:?} on event {}",
        game.id, game.slots, event.id
    );

    Ok(Json(event_response(event)?))
}

/// Adds a gamer to a game found by its game code.
///
/// # Endpoint
///
/// ```text
/// POST /api/games/join
/// ```
///
/// # Errors
///
/// * `PubError::NotFound` - no game with that code
/// * `PubError::Authentication` - wrong or missing access code for a private game
/// * `PubError::Authorization` - the gamer is banned by the event's publican
/// * `PubError::Validation` - the game is full or the gamer already joined
#[axum::debug_handler]
pub async fn join_game(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<JoinGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    if payload.gamer_id.trim().is_empty() {
        return Err(AppError(PubError::Validation(
            "gamer_id must not be empty".to_string(),
        )));
    }

    let game = state
        .store
        .get_game_by_code(payload.game_code.to_ascii_uppercase())
        .await?
        .ok_or_else(|| {
            PubError::NotFound(format!("Game with code {} not found", payload.game_code))
        })?;

    let allowed = auth::verify_access_code(
        game.access_code_hash.as_deref(),
        payload.access_code.as_deref(),
    )?;
    if !allowed {
        return Err(AppError(PubError::Authentication(
            "Invalid access code".to_string(),
        )));
    }

    let event = load_event(&state, game.event_id).await?;
    ensure_not_banned(&state, &event.publican_id, &payload.gamer_id).await?;

    let change = state
        .store
        .add_participant(game.id, payload.gamer_id.clone())
        .await?;
    let game = membership_result(change, game.id, |stored| {
        stored.add_participant(&payload.gamer_id)
    })?;

    info!("{} joined game {}", payload.gamer_id, game.id);
    Ok(Json(game.into()))
}

#[axum::debug_handler]
pub async fn leave_game(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeaveGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let change = state
        .store
        .remove_participant(id, payload.gamer_id.clone())
        .await?;
    let game = membership_result(change, id, |stored| {
        stored.remove_participant(&payload.gamer_id)
    })?;

    info!("{} left game {}", payload.gamer_id, game.id);
    Ok(Json(game.into()))
}
