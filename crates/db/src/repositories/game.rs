use crate::models::DbGame;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use pubgames_core::models::game::Game;
use uuid::Uuid;

const GAME_COLUMNS: &str = "id, event_id, host_id, game_name, game_desc, game_type, slots, \
                            max_players, game_code, access_code_hash, participants, created_at";

pub async fn create_game<'c>(executor: impl PgExecutor<'c>, game: &Game) -> Result<DbGame> {
    tracing::debug!(
        "Creating game: id={}, event_id={}, slots={:?}, max_players={}",
        game.id,
        game.event_id,
        game.slots,
        game.max_players
    );

    let query = format!(
        r#"
        INSERT INTO games (id, event_id, host_id, game_name, game_desc, game_type, slots,
                           max_players, game_code, access_code_hash, participants, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {GAME_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbGame>(&query)
        .bind(game.id)
        .bind(game.event_id)
        .bind(&game.host_id)
        .bind(&game.game_name)
        .bind(&game.game_desc)
        .bind(&game.game_type)
        .bind(&game.slots)
        .bind(i32::try_from(game.max_players)?)
        .bind(&game.game_code)
        .bind(&game.access_code_hash)
        .bind(&game.participants)
        .bind(game.created_at)
        .fetch_one(executor)
        .await?;

    Ok(row)
}

pub async fn get_game_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbGame>> {
    tracing::debug!("Getting game by id: {}", id);

    let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE id = $1");
    let row = sqlx::query_as::<_, DbGame>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn get_game_by_code(pool: &Pool<Postgres>, game_code: &str) -> Result<Option<DbGame>> {
    tracing::debug!("Getting game by code: {}", game_code);

    let query = format!("SELECT {GAME_COLUMNS} FROM games WHERE game_code = $1");
    let row = sqlx::query_as::<_, DbGame>(&query)
        .bind(game_code)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn get_games_by_event_id(pool: &Pool<Postgres>, event_id: Uuid) -> Result<Vec<DbGame>> {
    let query = format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE event_id = $1 ORDER BY created_at ASC"
    );
    let rows = sqlx::query_as::<_, DbGame>(&query)
        .bind(event_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn get_games_by_gamer(pool: &Pool<Postgres>, gamer_id: &str) -> Result<Vec<DbGame>> {
    tracing::debug!("Getting games of gamer: {}", gamer_id);

    let query = format!(
        "SELECT {GAME_COLUMNS} FROM games WHERE host_id = $1 OR $1 = ANY(participants) \
         ORDER BY created_at ASC"
    );
    let rows = sqlx::query_as::<_, DbGame>(&query)
        .bind(gamer_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Appends a participant in one statement.
///
/// Returns `None` when the game is missing, full or already has the gamer.
pub async fn add_participant(
    pool: &Pool<Postgres>,
    id: Uuid,
    gamer_id: &str,
) -> Result<Option<DbGame>> {
    tracing::debug!("Adding participant {} to game {}", gamer_id, id);

    let query = format!(
        r#"
        UPDATE games
        SET participants = array_append(participants, $2)
        WHERE id = $1
          AND NOT ($2 = ANY(participants))
          AND cardinality(participants) < max_players
        RETURNING {GAME_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbGame>(&query)
        .bind(id)
        .bind(gamer_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Removes a participant in one statement.
///
/// Returns `None` when the game is missing, the gamer is the host or never
/// joined.
pub async fn remove_participant(
    pool: &Pool<Postgres>,
    id: Uuid,
    gamer_id: &str,
) -> Result<Option<DbGame>> {
    tracing::debug!("Removing participant {} from game {}", gamer_id, id);

    let query = format!(
        r#"
        UPDATE games
        SET participants = array_remove(participants, $2)
        WHERE id = $1
          AND host_id <> $2
          AND $2 = ANY(participants)
        RETURNING {GAME_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbGame>(&query)
        .bind(id)
        .bind(gamer_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn delete_game<'c>(executor: impl PgExecutor<'c>, id: Uuid, event_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM games
        WHERE id = $1 AND event_id = $2
        "#,
    )
    .bind(id)
    .bind(event_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
