//! Booking flow for one user picking slots of one event.
//!
//! `Idle -> RangeSelected -> Validated -> Committed`. A failed range change
//! or validation leaves the flow in `RangeSelected` (or `Idle` when no range
//! was ever chosen) with the error kept in `last_error`. Nothing is retried.

use serde::{Deserialize, Serialize};

use crate::{
    booking::{BookingRequest, bind_party_size_to_selection},
    errors::{BookingError, BookingResult},
    models::calendar::AvailabilityCalendar,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    Idle,
    RangeSelected { request: BookingRequest },
    Validated { request: BookingRequest },
    Committed { request: BookingRequest },
}

#[derive(Debug, Clone)]
pub struct SlotSelection {
    state: SelectionState,
    last_error: Option<BookingError>,
}

impl Default for SlotSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotSelection {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            last_error: None,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&BookingError> {
        self.last_error.as_ref()
    }

    pub fn request(&self) -> Option<&BookingRequest> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::RangeSelected { request }
            | SelectionState::Validated { request }
            | SelectionState::Committed { request } => Some(request),
        }
    }

    /// Moves the selection to the run between `start_label` and `end_label`
    /// and clamps the current party size to the tightest slot of that run.
    ///
    /// A full slot still leaves a party of one selected, so validation can
    /// name the slot that is out of seats.
    pub fn select_range(
        &mut self,
        calendar: &AvailabilityCalendar,
        start_label: &str,
        end_label: &str,
    ) -> BookingResult<BookingRequest> {
        self.ensure_open()?;
        let current = self.request().map_or(1, |request| request.party_size);

        let resolved = BookingRequest::resolve(calendar, start_label, end_label, current)
            .and_then(|mut request| {
                request.party_size = bind_party_size_to_selection(
                    request.party_size,
                    calendar,
                    &request.selected_slot_labels,
                )?
                .max(1);
                Ok(request)
            });

        match resolved {
            Ok(request) => {
                self.last_error = None;
                self.state = SelectionState::RangeSelected {
                    request: request.clone(),
                };
                Ok(request)
            }
            Err(err) => {
                if let SelectionState::Validated { request } = &self.state {
                    self.state = SelectionState::RangeSelected {
                        request: request.clone(),
                    };
                }
                Err(self.fail(err))
            }
        }
    }

    /// Replaces the party size without clamping it; `validate` decides
    /// whether it fits.
    pub fn set_party_size(&mut self, party_size: u32) -> BookingResult<()> {
        self.ensure_open()?;
        let mut request = self.request().cloned().ok_or_else(|| {
            BookingError::InvalidSelection("choose a start and end slot first".to_string())
        })?;

        request.party_size = party_size;
        self.state = SelectionState::RangeSelected { request };
        Ok(())
    }

    pub fn validate(&mut self, calendar: &AvailabilityCalendar) -> BookingResult<()> {
        self.ensure_open()?;
        let request = self.request().cloned().ok_or_else(|| {
            BookingError::InvalidSelection("choose a start and end slot first".to_string())
        })?;

        match request.validate(calendar) {
            Ok(()) => {
                self.last_error = None;
                self.state = SelectionState::Validated { request };
                Ok(())
            }
            Err(err) => {
                self.state = SelectionState::RangeSelected { request };
                Err(self.fail(err))
            }
        }
    }

    /// Calendar to persist for the validated booking.
    pub fn booked_calendar(&self, calendar: &AvailabilityCalendar) -> BookingResult<AvailabilityCalendar> {
        match &self.state {
            SelectionState::Validated { request } => Ok(request.apply(calendar)),
            _ => Err(BookingError::InvalidSelection(
                "booking has not been validated".to_string(),
            )),
        }
    }

    /// Records that the booked calendar was persisted.
    pub fn commit(&mut self) -> BookingResult<BookingRequest> {
        match &self.state {
            SelectionState::Validated { request } => {
                let request = request.clone();
                self.state = SelectionState::Committed {
                    request: request.clone(),
                };
                Ok(request)
            }
            _ => Err(BookingError::InvalidSelection(
                "booking has not been validated".to_string(),
            )),
        }
    }

    fn ensure_open(&self) -> BookingResult<()> {
        if matches!(self.state, SelectionState::Committed { .. }) {
            return Err(BookingError::InvalidSelection(
                "booking is already committed".to_string(),
            ));
        }
        Ok(())
    }

    fn fail(&mut self, err: BookingError) -> BookingError {
        self.last_error = Some(err.clone());
        err
    }
}
