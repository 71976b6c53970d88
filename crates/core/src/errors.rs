use thiserror::Error;

/// Failures of the slot booking engine.
///
/// Every variant is a local validation failure that the caller recovers from
/// by re-prompting the user. None of them leaves a calendar partially updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Time slot not found: {0}")]
    SlotNotFound(String),

    #[error("Invalid time slot label: {0}")]
    InvalidLabel(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid party size: {0}, at least one seat must be requested")]
    InvalidPartySize(u32),

    #[error("Not enough seats left in: {}", .labels.join(", "))]
    InsufficientCapacity { labels: Vec<String> },
}

#[derive(Error, Debug)]
pub enum PubError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;

pub type PubResult<T> = Result<T, PubError>;
