//! # Booking store
//!
//! The persistence boundary of the booking flow. Handlers talk to a
//! [`BookingStore`] and never to a concrete database, which keeps the pure
//! booking engine unaware of how calendars are stored.
//!
//! Calendar writes are optimistic: every event carries a `version`, and
//! [`BookingStore::compare_and_swap_slots`] only writes when the caller saw
//! the latest one. [`modify_calendar`] wraps the read, engine step and
//! conditional write into one call and re-reads on conflicts.
//!
//! Participant lists are never written back whole. Joining and leaving are
//! single conditional writes, so two gamers joining at once both land.

use async_trait::async_trait;
use eyre::Result;
use tracing::{debug, warn};
use pubgames_core::{
    errors::{PubError, PubResult},
    models::{calendar::AvailabilityCalendar, event::Event, game::Game},
};
use uuid::Uuid;

/// The record change that must be committed together with a calendar write.
#[derive(Debug, Clone)]
pub enum CalendarChange {
    /// Insert a newly hosted game.
    Host(Game),
    /// Delete a cancelled game.
    Cancel(Uuid),
}

/// Result of [`BookingStore::compare_and_swap_slots`].
#[derive(Debug, Clone)]
pub enum SwapOutcome {
    /// Calendar and record change were committed.
    Swapped(Event),
    /// The event is no longer at the expected version.
    Stale,
    /// The game to cancel is not (or no longer) part of the event.
    GameMissing(Uuid),
}

/// Result of an atomic participant write.
#[derive(Debug, Clone)]
pub enum MembershipChange {
    Updated(Game),
    /// Nothing was written; carries the game as stored, if it exists.
    Refused(Option<Game>),
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_event(&self, event: Event) -> Result<Event>;

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Deletes an event together with its games.
    async fn delete_event(&self, id: Uuid) -> Result<bool>;

    /// Writes `calendar` and applies `change` in one step, but only if the
    /// event is still at `expected_version`.
    async fn compare_and_swap_slots(
        &self,
        event_id: Uuid,
        expected_version: i64,
        calendar: AvailabilityCalendar,
        change: CalendarChange,
    ) -> Result<SwapOutcome>;

    async fn get_game(&self, id: Uuid) -> Result<Option<Game>>;

    async fn get_game_by_code(&self, game_code: String) -> Result<Option<Game>>;

    async fn list_games(&self, event_id: Uuid) -> Result<Vec<Game>>;

    /// Games the gamer hosts or has joined.
    async fn list_games_for_gamer(&self, gamer_id: String) -> Result<Vec<Game>>;

    /// Appends `gamer_id` unless they already joined or the game is full.
    async fn add_participant(&self, game_id: Uuid, gamer_id: String) -> Result<MembershipChange>;

    /// Removes `gamer_id` unless they are the host or never joined.
    async fn remove_participant(&self, game_id: Uuid, gamer_id: String)
    -> Result<MembershipChange>;

    /// Returns `false` if the gamer was already banned.
    async fn ban_gamer(&self, publican_id: String, gamer_id: String) -> Result<bool>;

    /// Returns `false` if the gamer was not banned.
    async fn unban_gamer(&self, publican_id: String, gamer_id: String) -> Result<bool>;

    async fn list_banned(&self, publican_id: String) -> Result<Vec<String>>;

    async fn is_banned(&self, publican_id: String, gamer_id: String) -> Result<bool>;
}

/// Runs one booking engine step against the current calendar of an event and
/// commits its result.
///
/// `step` receives the freshly loaded event and returns the new calendar,
/// the record change to commit with it and a value handed back to the
/// caller. When the conditional write loses against a concurrent writer the
/// event is reloaded and `step` runs again, up to `attempts` times in total.
/// Errors returned by `step` end the loop immediately.
///
/// # Errors
///
/// * `PubError::NotFound` - the event does not exist, or the game to cancel
///   is already gone
/// * `PubError::Conflict` - every attempt lost against a concurrent writer
/// * whatever `step` returns
pub async fn modify_calendar<S, F, T>(
    store: &S,
    event_id: Uuid,
    attempts: u32,
    mut step: F,
) -> PubResult<(Event, T)>
where
    S: BookingStore + ?Sized,
    F: FnMut(&Event) -> PubResult<(AvailabilityCalendar, CalendarChange, T)>,
{
    let attempts = attempts.max(1);

    for attempt in 1..=attempts {
        let event = store
            .get_event(event_id)
            .await?
            .ok_or_else(|| PubError::NotFound(format!("Event with ID {} not found", event_id)))?;

        let (calendar, change, output) = step(&event)?;

        match store
            .compare_and_swap_slots(event_id, event.version, calendar, change)
            .await?
        {
            SwapOutcome::Swapped(updated) => {
                debug!(
                    "Calendar of event {} committed at version {}",
                    event_id, updated.version
                );
                return Ok((updated, output));
            }
            SwapOutcome::Stale => warn!(
                "Calendar of event {} changed during attempt {}/{}",
                event_id, attempt, attempts
            ),
            SwapOutcome::GameMissing(game_id) => {
                return Err(PubError::NotFound(format!(
                    "Game with ID {} not found",
                    game_id
                )));
            }
        }
    }

    Err(PubError::Conflict(format!(
        "Event {} was updated concurrently, please try again",
        event_id
    )))
}
