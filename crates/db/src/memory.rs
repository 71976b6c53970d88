use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use eyre::{Result, eyre};
use tokio::sync::RwLock;
use pubgames_core::models::{calendar::AvailabilityCalendar, event::Event, game::Game};
use uuid::Uuid;

use crate::store::{BookingStore, CalendarChange, MembershipChange, SwapOutcome};

#[derive(Debug, Default)]
struct MemoryState {
    events: HashMap<Uuid, Event>,
    games: HashMap<Uuid, Game>,
    bans: HashMap<String, BTreeSet<String>>,
}

/// [`BookingStore`] kept in process memory.
///
/// Used by tests and when the server runs without a database. Every
/// conditional write holds the write lock from check to update.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create_event(&self, event: Event) -> Result<Event> {
        let mut state = self.state.write().await;
        if state.events.contains_key(&event.id) {
            return Err(eyre!("Event {} already exists", event.id));
        }
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.state.read().await.events.get(&id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.state.read().await.events.values().cloned().collect();
        events.sort_by_key(|event| event.start_time);
        Ok(events)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let removed = state.events.remove(&id).is_some();
        if removed {
            state.games.retain(|_, game| game.event_id != id);
        }
        Ok(removed)
    }

    async fn compare_and_swap_slots(
        &self,
        event_id: Uuid,
        expected_version: i64,
        calendar: AvailabilityCalendar,
        change: CalendarChange,
    ) -> Result<SwapOutcome> {
        let mut state = self.state.write().await;
        let MemoryState { events, games, .. } = &mut *state;

        let Some(event) = events.get_mut(&event_id) else {
            return Ok(SwapOutcome::Stale);
        };
        if event.version != expected_version {
            return Ok(SwapOutcome::Stale);
        }

        match change {
            CalendarChange::Host(game) => {
                if games.values().any(|g| g.game_code == game.game_code) {
                    return Err(eyre!("Game code {} is already in use", game.game_code));
                }
                games.insert(game.id, game);
            }
            CalendarChange::Cancel(game_id) => {
                let belongs = games
                    .get(&game_id)
                    .is_some_and(|game| game.event_id == event_id);
                if !belongs {
                    return Ok(SwapOutcome::GameMissing(game_id));
                }
                games.remove(&game_id);
            }
        }

        event.available_slots = calendar;
        event.version += 1;
        Ok(SwapOutcome::Swapped(event.clone()))
    }

    async fn get_game(&self, id: Uuid) -> Result<Option<Game>> {
        Ok(self.state.read().await.games.get(&id).cloned())
    }

    async fn get_game_by_code(&self, game_code: String) -> Result<Option<Game>> {
        Ok(self
            .state
            .read()
            .await
            .games
            .values()
            .find(|game| game.game_code == game_code)
            .cloned())
    }

    async fn list_games(&self, event_id: Uuid) -> Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .state
            .read()
            .await
            .games
            .values()
            .filter(|game| game.event_id == event_id)
            .cloned()
            .collect();
        games.sort_by_key(|game| game.created_at);
        Ok(games)
    }

    async fn list_games_for_gamer(&self, gamer_id: String) -> Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .state
            .read()
            .await
            .games
            .values()
            .filter(|game| game.host_id == gamer_id || game.has_participant(&gamer_id))
            .cloned()
            .collect();
        games.sort_by_key(|game| game.created_at);
        Ok(games)
    }

    async fn add_participant(&self, game_id: Uuid, gamer_id: String) -> Result<MembershipChange> {
        let mut state = self.state.write().await;
        let Some(game) = state.games.get_mut(&game_id) else {
            return Ok(MembershipChange::Refused(None));
        };

        Ok(match game.add_participant(&gamer_id) {
            Ok(()) => MembershipChange::Updated(game.clone()),
            Err(_) => MembershipChange::Refused(Some(game.clone())),
        })
    }

    async fn remove_participant(
        &self,
        game_id: Uuid,
        gamer_id: String,
    ) -> Result<MembershipChange> {
        let mut state = self.state.write().await;
        let Some(game) = state.games.get_mut(&game_id) else {
            return Ok(MembershipChange::Refused(None));
        };

        Ok(match game.remove_participant(&gamer_id) {
            Ok(()) => MembershipChange::Updated(game.clone()),
            Err(_) => MembershipChange::Refused(Some(game.clone())),
        })
    }

    async fn ban_gamer(&self, publican_id: String, gamer_id: String) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.bans.entry(publican_id).or_default().insert(gamer_id))
    }

    async fn unban_gamer(&self, publican_id: String, gamer_id: String) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state
            .bans
            .get_mut(&publican_id)
            .is_some_and(|banned| banned.remove(&gamer_id)))
    }

    async fn list_banned(&self, publican_id: String) -> Result<Vec<String>> {
        Ok(self
            .state
            .read()
            .await
            .bans
            .get(&publican_id)
            .map(|banned| banned.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn is_banned(&self, publican_id: String, gamer_id: String) -> Result<bool> {
        Ok(self
            .state
            .read()
            .await
            .bans
            .get(&publican_id)
            .is_some_and(|banned| banned.contains(&gamer_id)))
    }
}
