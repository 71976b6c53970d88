use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Events own the availability calendar; version guards its updates
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            publican_id VARCHAR(255) NOT NULL,
            game_type VARCHAR(64) NOT NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            expires TIMESTAMP WITH TIME ZONE NOT NULL,
            num_seats INTEGER NOT NULL CHECK (num_seats >= 0),
            available_slots JSONB NOT NULL DEFAULT '{}'::jsonb,
            version BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_event_window CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            host_id VARCHAR(255) NOT NULL,
            game_name VARCHAR(255) NOT NULL,
            game_desc TEXT NOT NULL DEFAULT '',
            game_type VARCHAR(64) NOT NULL,
            slots TEXT[] NOT NULL,
            max_players INTEGER NOT NULL CHECK (max_players >= 1),
            game_code VARCHAR(16) NOT NULL UNIQUE,
            access_code_hash VARCHAR(255) NULL,
            participants TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_games_event_id ON games(event_id);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_games_host_id ON games(host_id);
        "#,
    )
    .execute(pool)
    .await?;

    // Gamers a publican keeps out of their events' games
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS publican_bans (
            publican_id VARCHAR(255) NOT NULL,
            gamer_id VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (publican_id, gamer_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
