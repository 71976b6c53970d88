use crate::models::DbEvent;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres, types::Json};
use pubgames_core::models::{calendar::AvailabilityCalendar, event::Event};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, publican_id, game_type, start_time, end_time, expires, \
                             num_seats, available_slots, version, created_at";

pub async fn create_event(pool: &Pool<Postgres>, event: &Event) -> Result<DbEvent> {
    tracing::debug!(
        "Creating event: id={}, publican_id={}, slots={}",
        event.id,
        event.publican_id,
        event.available_slots.len()
    );

    let query = format!(
        r#"
        INSERT INTO events (id, publican_id, game_type, start_time, end_time, expires,
                            num_seats, available_slots, version, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {EVENT_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbEvent>(&query)
        .bind(event.id)
        .bind(&event.publican_id)
        .bind(&event.game_type)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.expires)
        .bind(i32::try_from(event.num_seats)?)
        .bind(Json(&event.available_slots))
        .bind(event.version)
        .bind(event.created_at)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

pub async fn get_event_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEvent>> {
    tracing::debug!("Getting event by id: {}", id);

    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
    let row = sqlx::query_as::<_, DbEvent>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn list_events(pool: &Pool<Postgres>) -> Result<Vec<DbEvent>> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY start_time ASC");
    let rows = sqlx::query_as::<_, DbEvent>(&query).fetch_all(pool).await?;

    Ok(rows)
}

/// Replaces the calendar of an event if its version is still `expected_version`.
///
/// Returns `None` when another writer got there first.
pub async fn update_available_slots<'c>(
    executor: impl PgExecutor<'c>,
    id: Uuid,
    expected_version: i64,
    calendar: &AvailabilityCalendar,
) -> Result<Option<DbEvent>> {
    tracing::debug!(
        "Updating available slots: id={}, expected_version={}",
        id,
        expected_version
    );

    let query = format!(
        r#"
        UPDATE events
        SET available_slots = $3, version = version + 1
        WHERE id = $1 AND version = $2
        RETURNING {EVENT_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DbEvent>(&query)
        .bind(id)
        .bind(expected_version)
        .bind(Json(calendar))
        .fetch_optional(executor)
        .await?;

    Ok(row)
}

/// Deletes an event. Its games go with it through the foreign key.
pub async fn delete_event(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
