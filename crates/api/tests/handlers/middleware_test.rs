use axum::{body::to_bytes, http::StatusCode};
use pretty_assertions::assert_eq;
use pubgames_api::middleware::{auth, error_handling::map_error};
use pubgames_core::errors::{BookingError, PubError};
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case::not_found(PubError::NotFound("Event not found".to_string()), StatusCode::NOT_FOUND)]
#[case::validation(PubError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case::unknown_slot(
    PubError::Booking(BookingError::SlotNotFound("02:00-03:00".to_string())),
    StatusCode::NOT_FOUND
)]
#[case::party_size(PubError::Booking(BookingError::InvalidPartySize(0)), StatusCode::UNPROCESSABLE_ENTITY)]
#[case::conflict(PubError::Conflict("Event was updated".to_string()), StatusCode::CONFLICT)]
#[case::authentication(PubError::Authentication("Invalid access code".to_string()), StatusCode::UNAUTHORIZED)]
#[case::authorization(PubError::Authorization("Not the host".to_string()), StatusCode::FORBIDDEN)]
#[case::database(PubError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(
    PubError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: PubError, #[case] status: StatusCode) {
    assert_eq!(map_error(error).status(), status);
}

#[tokio::test]
async fn test_insufficient_capacity_lists_full_slots() {
    let error = PubError::Booking(BookingError::InsufficientCapacity {
        labels: vec!["20:00-21:00".to_string(), "21:00-22:00".to_string()],
    });

    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["slots"], serde_json::json!(["20:00-21:00", "21:00-22:00"]));
    assert!(body["error"].as_str().unwrap().contains("20:00-21:00, 21:00-22:00"));
}

#[test]
fn test_access_code_round_trip() {
    let hashed = auth::hash_access_code("meeple").unwrap();

    assert_ne!(hashed, "meeple");
    assert!(hashed.starts_with("$argon2"));
    assert!(auth::verify_access_code(Some(&hashed), Some("meeple")).unwrap());
    assert!(!auth::verify_access_code(Some(&hashed), Some("dice")).unwrap());
    assert!(!auth::verify_access_code(Some(&hashed), None).unwrap());
}

#[test]
fn test_public_game_accepts_any_code() {
    assert!(auth::verify_access_code(None, None).unwrap());
    assert!(auth::verify_access_code(None, Some("anything")).unwrap());
}

#[test]
fn test_corrupt_hash_is_an_error() {
    assert!(auth::verify_access_code(Some("not a hash"), Some("meeple")).is_err());
}

#[test]
fn test_game_codes_are_short_upper_case_alphanumeric() {
    for _ in 0..50 {
        let code = auth::generate_game_code();
        assert_eq!(code.len(), auth::GAME_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
