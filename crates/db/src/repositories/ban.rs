use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn ban_gamer(pool: &Pool<Postgres>, publican_id: &str, gamer_id: &str) -> Result<bool> {
    tracing::debug!("Banning gamer {} from publican {}", gamer_id, publican_id);

    let result = sqlx::query(
        r#"
        INSERT INTO publican_bans (publican_id, gamer_id)
        VALUES ($1, $2)
        ON CONFLICT (publican_id, gamer_id) DO NOTHING
        "#,
    )
    .bind(publican_id)
    .bind(gamer_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unban_gamer(pool: &Pool<Postgres>, publican_id: &str, gamer_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM publican_bans
        WHERE publican_id = $1 AND gamer_id = $2
        "#,
    )
    .bind(publican_id)
    .bind(gamer_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_banned(pool: &Pool<Postgres>, publican_id: &str) -> Result<Vec<String>> {
    let banned = sqlx::query_scalar::<_, String>(
        "SELECT gamer_id FROM publican_bans WHERE publican_id = $1 ORDER BY gamer_id ASC",
    )
    .bind(publican_id)
    .fetch_all(pool)
    .await?;

    Ok(banned)
}

pub async fn is_banned(pool: &Pool<Postgres>, publican_id: &str, gamer_id: &str) -> Result<bool> {
    let banned = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM publican_bans WHERE publican_id = $1 AND gamer_id = $2
        )
        "#,
    )
    .bind(publican_id)
    .bind(gamer_id)
    .fetch_one(pool)
    .await?;

    Ok(banned)
}
