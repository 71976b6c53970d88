use axum::http::StatusCode;
use chrono::Duration;
use pretty_assertions::assert_eq;
use pubgames_core::models::event::{EventResponse, SlotSelectionRequest, SlotSelectionResponse};
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

use crate::test_utils::{
    capacities, create_event, evening_event, evening_start, get_event, host_game, host_request,
    test_server,
};

#[test_log::test(tokio::test)]
async fn test_create_event_builds_hourly_calendar() {
    let server = test_server();

    let response = server.post("/api/events").json(&evening_event(4)).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let event = response.json::<EventResponse>();
    let labels: Vec<&str> = event.slots.iter().map(|slot| slot.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["19:00-20:00", "20:00-21:00", "21:00-22:00", "22:00-23:00"]
    );
    assert_eq!(capacities(&event), vec![4, 4, 4, 4]);
    assert_eq!(event.version, 0);
}

#[rstest]
#[case::no_seats(0, 4, "Seat Based")]
#[case::empty_window(4, 0, "Seat Based")]
#[case::unsupported_game_type(4, 4, "Table Based")]
#[tokio::test]
async fn test_create_event_rejects_invalid_requests(
    #[case] num_seats: u32,
    #[case] hours: i64,
    #[case] game_type: &str,
) {
    let server = test_server();
    let mut request = evening_event(num_seats);
    request.end_time = evening_start() + Duration::hours(hours);
    request.game_type = game_type.to_string();

    let response = server.post("/api/events").json(&request).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_get_unknown_event_is_not_found() {
    let server = test_server();

    let response = server.get(&format!("/api/events/{}", Uuid::new_v4())).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[test_log::test(tokio::test)]
async fn test_list_events() {
    let server = test_server();
    let first = create_event(&server, 4).await;
    let second = create_event(&server, 6).await;

    let events = server.get("/api/events").await.json::<Vec<EventResponse>>();

    let mut ids: Vec<Uuid> = events.iter().map(|event| event.id).collect();
    ids.sort();
    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[test_log::test(tokio::test)]
async fn test_delete_event_removes_it_and_its_games() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let game = host_game(&server, event.id, &host_request("19:00-20:00", "19:00-20:00", 2)).await;

    let response = server.delete(&format!("/api/events/{}", event.id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/events/{}", event.id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let response = server.get(&format!("/api/games/{}", game.id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.delete(&format!("/api/events/{}", event.id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_preview_selection_defaults_to_largest_party() {
    let server = test_server();
    let event = create_event(&server, 4).await;

    let preview = server
        .post(&format!("/api/events/{}/selection", event.id))
        .json(&SlotSelectionRequest {
            start_slot: "21:00-22:00".to_string(),
            end_slot: "19:00-20:00".to_string(),
            party_size: None,
        })
        .await
        .json::<SlotSelectionResponse>();

    assert_eq!(
        preview.slots,
        vec!["19:00-20:00", "20:00-21:00", "21:00-22:00"]
    );
    assert_eq!(preview.max_party_size, 4);
    assert_eq!(preview.party_size, 4);
}

#[test_log::test(tokio::test)]
async fn test_preview_selection_clamps_party_to_tightest_slot() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    host_game(&server, event.id, &host_request("20:00-21:00", "20:00-21:00", 3)).await;

    let preview = server
        .post(&format!("/api/events/{}/selection", event.id))
        .json(&SlotSelectionRequest {
            start_slot: "19:00-20:00".to_string(),
            end_slot: "21:00-22:00".to_string(),
            party_size: Some(5),
        })
        .await
        .json::<SlotSelectionResponse>();

    assert_eq!(preview.max_party_size, 1);
    assert_eq!(preview.party_size, 1);

    // Previewing never books anything
    assert_eq!(capacities(&get_event(&server, event.id).await), vec![4, 1, 4, 4]);
}

#[test_log::test(tokio::test)]
async fn test_preview_selection_with_unknown_slot() {
    let server = test_server();
    let event = create_event(&server, 4).await;

    let response = server
        .post(&format!("/api/events/{}/selection", event.id))
        .json(&SlotSelectionRequest {
            start_slot: "19:00-20:00".to_string(),
            end_slot: "02:00-03:00".to_string(),
            party_size: None,
        })
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_health_reports_store_status() {
    let server = test_server();
    create_event(&server, 2).await;

    let body = server.get("/health").await.json::<Value>();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["events"], 1);
}
