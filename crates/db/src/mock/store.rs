use async_trait::async_trait;
use mockall::mock;
use pubgames_core::models::{calendar::AvailabilityCalendar, event::Event, game::Game};
use uuid::Uuid;

use crate::store::{BookingStore, CalendarChange, MembershipChange, SwapOutcome};

// Mock store for handler and retry-loop tests
mock! {
    pub Store {}

    #[async_trait]
    impl BookingStore for Store {
        async fn create_event(&self, event: Event) -> eyre::Result<Event>;

        async fn get_event(&self, id: Uuid) -> eyre::Result<Option<Event>>;

        async fn list_events(&self) -> eyre::Result<Vec<Event>>;

        async fn delete_event(&self, id: Uuid) -> eyre::Result<bool>;

        async fn compare_and_swap_slots(
            &self,
            event_id: Uuid,
            expected_version: i64,
            calendar: AvailabilityCalendar,
            change: CalendarChange,
        ) -> eyre::Result<SwapOutcome>;

        async fn get_game(&self, id: Uuid) -> eyre::Result<Option<Game>>;

        async fn get_game_by_code(&self, game_code: String) -> eyre::Result<Option<Game>>;

        async fn list_games(&self, event_id: Uuid) -> eyre::Result<Vec<Game>>;

        async fn list_games_for_gamer(&self, gamer_id: String) -> eyre::Result<Vec<Game>>;

        async fn add_participant(
            &self,
            game_id: Uuid,
            gamer_id: String,
        ) -> eyre::Result<MembershipChange>;

        async fn remove_participant(
            &self,
            game_id: Uuid,
            gamer_id: String,
        ) -> eyre::Result<MembershipChange>;

        async fn ban_gamer(&self, publican_id: String, gamer_id: String) -> eyre::Result<bool>;

        async fn unban_gamer(&self, publican_id: String, gamer_id: String) -> eyre::Result<bool>;

        async fn list_banned(&self, publican_id: String) -> eyre::Result<Vec<String>>;

        async fn is_banned(&self, publican_id: String, gamer_id: String) -> eyre::Result<bool>;
    }
}
