use async_trait::async_trait;
use eyre::Result;
use pubgames_core::models::{calendar::AvailabilityCalendar, event::Event, game::Game};
use uuid::Uuid;

use crate::{
    DbPool,
    models::DbGame,
    repositories::{ban, event, game},
    store::{BookingStore, CalendarChange, MembershipChange, SwapOutcome},
};

/// [`BookingStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// A conditional participant write that matched no row is reported
    /// together with the game as it is stored now.
    async fn membership_change(
        &self,
        game_id: Uuid,
        updated: Option<DbGame>,
    ) -> Result<MembershipChange> {
        match updated {
            Some(row) => Ok(MembershipChange::Updated(row.try_into()?)),
            None => Ok(MembershipChange::Refused(
                game::get_game_by_id(&self.pool, game_id)
                    .await?
                    .map(Game::try_from)
                    .transpose()?,
            )),
        }
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn create_event(&self, new_event: Event) -> Result<Event> {
        event::create_event(&self.pool, &new_event).await?.try_into()
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        event::get_event_by_id(&self.pool, id)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        event::list_events(&self.pool)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        event::delete_event(&self.pool, id).await
    }

    async fn compare_and_swap_slots(
        &self,
        event_id: Uuid,
        expected_version: i64,
        calendar: AvailabilityCalendar,
        change: CalendarChange,
    ) -> Result<SwapOutcome> {
        let mut tx = self.pool.begin().await?;

        let Some(updated) =
            event::update_available_slots(&mut *tx, event_id, expected_version, &calendar).await?
        else {
            tx.rollback().await?;
            return Ok(SwapOutcome::Stale);
        };

        match change {
            CalendarChange::Host(new_game) => {
                game::create_game(&mut *tx, &new_game).await?;
            }
            CalendarChange::Cancel(game_id) => {
                if !game::delete_game(&mut *tx, game_id, event_id).await? {
                    tx.rollback().await?;
                    return Ok(SwapOutcome::GameMissing(game_id));
                }
            }
        }

        tx.commit().await?;
        Ok(SwapOutcome::Swapped(updated.try_into()?))
    }

    async fn get_game(&self, id: Uuid) -> Result<Option<Game>> {
        game::get_game_by_id(&self.pool, id)
            .await?
            .map(Game::try_from)
            .transpose()
    }

    async fn get_game_by_code(&self, game_code: String) -> Result<Option<Game>> {
        game::get_game_by_code(&self.pool, &game_code)
            .await?
            .map(Game::try_from)
            .transpose()
    }

    async fn list_games(&self, event_id: Uuid) -> Result<Vec<Game>> {
        game::get_games_by_event_id(&self.pool, event_id)
            .await?
            .into_iter()
            .map(Game::try_from)
            .collect()
    }

    async fn list_games_for_gamer(&self, gamer_id: String) -> Result<Vec<Game>> {
        game::get_games_by_gamer(&self.pool, &gamer_id)
            .await?
            .into_iter()
            .map(Game::try_from)
            .collect()
    }

    async fn add_participant(&self, game_id: Uuid, gamer_id: String) -> Result<MembershipChange> {
        let updated = game::add_participant(&self.pool, game_id, &gamer_id).await?;
        self.membership_change(game_id, updated).await
    }

    async fn remove_participant(
        &self,
        game_id: Uuid,
        gamer_id: String,
    ) -> Result<MembershipChange> {
        let updated = game::remove_participant(&self.pool, game_id, &gamer_id).await?;
        self.membership_change(game_id, updated).await
    }

    async fn ban_gamer(&self, publican_id: String, gamer_id: String) -> Result<bool> {
        ban::ban_gamer(&self.pool, &publican_id, &gamer_id).await
    }

    async fn unban_gamer(&self, publican_id: String, gamer_id: String) -> Result<bool> {
        ban::unban_gamer(&self.pool, &publican_id, &gamer_id).await
    }

    async fn list_banned(&self, publican_id: String) -> Result<Vec<String>> {
        ban::list_banned(&self.pool, &publican_id).await
    }

    async fn is_banned(&self, publican_id: String, gamer_id: String) -> Result<bool> {
        ban::is_banned(&self.pool, &publican_id, &gamer_id).await
    }
}
