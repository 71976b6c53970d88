//! # Slot Booking Engine
//!
//! Pure functions that turn a start/end slot choice into the contiguous run
//! of calendar labels it spans, check that every slot of the run has room for
//! the whole party, and compute the calendar after booking or cancelling.
//!
//! Nothing here performs I/O or keeps state. Callers fetch a calendar
//! snapshot, validate and apply against that same snapshot, then hand the
//! result to the store, which decides whether the snapshot is still current.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{BookingError, BookingResult},
    models::calendar::AvailabilityCalendar,
};

/// Resolves a start/end slot choice into the chronological run of labels
/// between them, both ends included.
///
/// The two endpoints may be given in either order.
///
/// # Errors
///
/// * `BookingError::SlotNotFound` - either label is missing from the calendar
/// * `BookingError::InvalidLabel` - a calendar label does not parse
pub fn resolve_selected_slots(
    calendar: &AvailabilityCalendar,
    start_label: &str,
    end_label: &str,
) -> BookingResult<Vec<String>> {
    let ordered = calendar.chronological_labels()?;

    let position = |label: &str| {
        ordered
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| BookingError::SlotNotFound(label.to_string()))
    };
    let start = position(start_label)?;
    let end = position(end_label)?;

    let (lo, hi) = (start.min(end), start.max(end));
    Ok(ordered[lo..=hi].to_vec())
}

/// The largest party every selected slot can still seat.
pub fn max_party_size(calendar: &AvailabilityCalendar, selected: &[String]) -> BookingResult<u32> {
    if selected.is_empty() {
        return Err(BookingError::InvalidSelection(
            "no time slots selected".to_string(),
        ));
    }

    selected
        .iter()
        .map(|label| {
            calendar
                .capacity(label)
                .ok_or_else(|| BookingError::SlotNotFound(label.clone()))
        })
        .try_fold(u32::MAX, |min, capacity| Ok(min.min(capacity?)))
}

/// Checks that a party of `party_size` fits into every selected slot.
///
/// Labels missing from the calendar count as having no seats left.
pub fn validate_booking(
    calendar: &AvailabilityCalendar,
    selected: &[String],
    party_size: u32,
) -> BookingResult<()> {
    if party_size < 1 {
        return Err(BookingError::InvalidPartySize(party_size));
    }
    if selected.is_empty() {
        return Err(BookingError::InvalidSelection(
            "no time slots selected".to_string(),
        ));
    }

    let labels: Vec<String> = selected
        .iter()
        .filter(|label| calendar.capacity(label).unwrap_or(0) < party_size)
        .cloned()
        .collect();

    if labels.is_empty() {
        Ok(())
    } else {
        Err(BookingError::InsufficientCapacity { labels })
    }
}

/// Returns the calendar after taking `party_size` seats from every selected
/// slot.
///
/// Expects `validate_booking` to have passed against the same calendar.
pub fn apply_booking(
    calendar: &AvailabilityCalendar,
    selected: &[String],
    party_size: u32,
) -> AvailabilityCalendar {
    let mut booked = calendar.clone();
    for label in selected {
        if let Some(capacity) = booked.slots.get_mut(label) {
            *capacity = capacity.saturating_sub(party_size);
        }
    }
    booked
}

/// Returns the calendar after giving `party_size` seats back to every
/// selected slot. Exact inverse of `apply_booking`, no upper bound applied.
pub fn release_booking(
    calendar: &AvailabilityCalendar,
    selected: &[String],
    party_size: u32,
) -> AvailabilityCalendar {
    let mut released = calendar.clone();
    for label in selected {
        if let Some(capacity) = released.slots.get_mut(label) {
            *capacity = capacity.saturating_add(party_size);
        }
    }
    released
}

/// Clamps the party size the user picked to what the new selection can seat.
pub fn bind_party_size_to_selection(
    current_party_size: u32,
    calendar: &AvailabilityCalendar,
    selected: &[String],
) -> BookingResult<u32> {
    Ok(current_party_size.min(max_party_size(calendar, selected)?))
}

/// A resolved, not yet validated booking against one calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub selected_slot_labels: Vec<String>,
    pub party_size: u32,
}

impl BookingRequest {
    pub fn resolve(
        calendar: &AvailabilityCalendar,
        start_label: &str,
        end_label: &str,
        party_size: u32,
    ) -> BookingResult<Self> {
        Ok(Self {
            selected_slot_labels: resolve_selected_slots(calendar, start_label, end_label)?,
            party_size,
        })
    }

    pub fn validate(&self, calendar: &AvailabilityCalendar) -> BookingResult<()> {
        validate_booking(calendar, &self.selected_slot_labels, self.party_size)
    }

    pub fn apply(&self, calendar: &AvailabilityCalendar) -> AvailabilityCalendar {
        apply_booking(calendar, &self.selected_slot_labels, self.party_size)
    }

    pub fn release(&self, calendar: &AvailabilityCalendar) -> AvailabilityCalendar {
        release_booking(calendar, &self.selected_slot_labels, self.party_size)
    }
}
