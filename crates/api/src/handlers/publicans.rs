//! # Publican Ban Lists
//!
//! A publican can ban gamers from the games hosted on their events. Banned
//! gamers can neither host nor join such a game; games they are already part
//! of are left alone.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pubgames_core::{
    errors::{PubError, PubResult},
    models::publican::{BanRequest, BannedGamersResponse},
};
use std::sync::Arc;
use tracing::info;

use crate::{ApiState, middleware::error_handling::AppError};

/// Fails with `PubError::Authorization` when `gamer_id` is on the
/// publican's ban list.
pub(crate) async fn ensure_not_banned(
    state: &ApiState,
    publican_id: &str,
    gamer_id: &str,
) -> PubResult<()> {
    if state
        .store
        .is_banned(publican_id.to_string(), gamer_id.to_string())
        .await?
    {
        return Err(PubError::Authorization(format!(
            "{} is banned from games at {}",
            gamer_id, publican_id
        )));
    }
    Ok(())
}

async fn banned_response(state: &ApiState, publican_id: String) -> PubResult<BannedGamersResponse> {
    let banned = state.store.list_banned(publican_id.clone()).await?;
    Ok(BannedGamersResponse {
        publican_id,
        banned,
    })
}

#[axum::debug_handler]
pub async fn list_banned(
    State(state): State<Arc<ApiState>>,
    Path(publican_id): Path<String>,
) -> Result<Json<BannedGamersResponse>, AppError> {
    Ok(Json(banned_response(&state, publican_id).await?))
}

/// Adds a gamer to the publican's ban list.
///
/// # Endpoint
///
/// ```text
/// POST /api/publicans/:id/bans
/// ```
///
/// Answers `201 Created` for a new ban and `200 OK` if the gamer was
/// already banned.
#[axum::debug_handler]
pub async fn ban_gamer(
    State(state): State<Arc<ApiState>>,
    Path(publican_id): Path<String>,
    Json(payload): Json<BanRequest>,
) -> Result<(StatusCode, Json<BannedGamersResponse>), AppError> {
    if payload.gamer_id.trim().is_empty() {
        return Err(AppError(PubError::Validation(
            "gamer_id must not be empty".to_string(),
        )));
    }

    let added = state
        .store
        .ban_gamer(publican_id.clone(), payload.gamer_id.clone())
        .await?;
    if added {
        info!("{} banned {}", publican_id, payload.gamer_id);
    }

    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(banned_response(&state, publican_id).await?)))
}

#[axum::debug_handler]
pub async fn unban_gamer(
    State(state): State<Arc<ApiState>>,
    Path((publican_id, gamer_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    if !state
        .store
        .unban_gamer(publican_id.clone(), gamer_id.clone())
        .await?
    {
        return Err(AppError(PubError::NotFound(format!(
            "{} is not banned by {}",
            gamer_id, publican_id
        ))));
    }

    info!("{} unbanned {}", publican_id, gamer_id);
    Ok(StatusCode::NO_CONTENT)
}
