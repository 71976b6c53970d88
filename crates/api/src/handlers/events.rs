//! # Event Handlers
//!
//! Publicans publish events; each event owns the availability calendar that
//! games are booked against. Creating an event generates that calendar, one
//! slot per whole hour of the event window, every slot starting at the
//! event's seat count.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use pubgames_core::{
    booking::{bind_party_size_to_selection, max_party_size, resolve_selected_slots},
    errors::{PubError, PubResult},
    models::{
        calendar::AvailabilityCalendar,
        event::{
            CreateEventRequest, Event, EventResponse, SEAT_BASED, SlotSelectionRequest,
            SlotSelectionResponse,
        },
        game::GameResponse,
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

pub(crate) fn event_response(event: Event) -> PubResult<EventResponse> {
    let slots = event.available_slots.slots()?;
    Ok(EventResponse {
        id: event.id,
        publican_id: event.publican_id,
        game_type: event.game_type,
        start_time: event.start_time,
        end_time: event.end_time,
        expires: event.expires,
        num_seats: event.num_seats,
        available_slots: event.available_slots,
        slots,
        version: event.version,
        created_at: event.created_at,
    })
}

pub(crate) async fn load_event(state: &ApiState, id: Uuid) -> PubResult<Event> {
    state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| PubError::NotFound(format!("Event with ID {} not found", id)))
}

/// Publishes a new event and its availability calendar.
///
/// # Endpoint
///
/// ```text
/// POST /api/events
/// ```
///
/// # Errors
///
/// * `PubError::Validation` - empty publican id, zero seats, unsupported game
///   type or an event window that yields no bookable hour
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    if payload.publican_id.trim().is_empty() {
        return Err(AppError(PubError::Validation(
            "publican_id must not be empty".to_string(),
        )));
    }
    if payload.game_type != SEAT_BASED {
        return Err(AppError(PubError::Validation(format!(
            "Unsupported game type: {}",
            payload.game_type
        ))));
    }
    if payload.num_seats < 1 {
        return Err(AppError(PubError::Validation(
            "An event needs at least one seat".to_string(),
        )));
    }

    let available_slots =
        AvailabilityCalendar::for_window(payload.start_time, payload.end_time, payload.num_seats)?;

    let event = state
        .store
        .create_event(Event {
            id: Uuid::new_v4(),
            publican_id: payload.publican_id,
            game_type: payload.game_type,
            start_time: payload.start_time,
            end_time: payload.end_time,
            expires: payload.expires,
            num_seats: payload.num_seats,
            available_slots,
            version: 0,
            created_at: Utc::now(),
        })
        .await?;

    info!(
        "Event {} published by {} with {} slots",
        event.id,
        event.publican_id,
        event.available_slots.len()
    );

    Ok((StatusCode::CREATED, Json(event_response(event)?)))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event = load_event(&state, id).await?;
    Ok(Json(event_response(event)?))
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state
        .store
        .list_events()
        .await?
        .into_iter()
        .map(event_response)
        .collect::<PubResult<Vec<_>>>()?;

    Ok(Json(events))
}

/// Deletes an event; its calendar and games go with it.
#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_event(id).await? {
        return Err(AppError(PubError::NotFound(format!(
            "Event with ID {} not found",
            id
        ))));
    }

    info!("Event {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_event_games(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    load_event(&state, id).await?;

    let games = state
        .store
        .list_games(id)
        .await?
        .into_iter()
        .map(GameResponse::from)
        .collect();

    Ok(Json(games))
}

/// Previews a slot selection without booking anything.
///
/// Resolves the start and end slot into the run between them, reports the
/// largest party every slot of the run can seat, and clamps the party size
/// the user currently has picked to it. A missing party size counts as the
/// largest possible one.
///
/// # Endpoint
///
/// ```text
/// POST /api/events/:id/selection
/// ```
#[axum::debug_handler]
pub async fn preview_selection(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SlotSelectionRequest>,
) -> Result<Json<SlotSelectionResponse>, AppError> {
    let event = load_event(&state, id).await?;
    let calendar = &event.available_slots;

    let slots = resolve_selected_slots(calendar, &payload.start_slot, &payload.end_slot)?;
    let max_party_size = max_party_size(calendar, &slots)?;
    let party_size = bind_party_size_to_selection(
        payload.party_size.unwrap_or(max_party_size),
        calendar,
        &slots,
    )?;

    Ok(Json(SlotSelectionResponse {
        slots,
        max_party_size,
        party_size,
    }))
}
