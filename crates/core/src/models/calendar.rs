use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult, PubError, PubResult};

/// Length of one bookable slot.
pub const SLOT_MINUTES: i64 = 60;

const CLOCK_FORMAT: &str = "%H:%M";

/// One bookable hour of an event together with its remaining seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub label: String,
    pub capacity: u32,
}

/// Builds the canonical `"HH:MM-HH:MM"` label of the slot starting at `start`.
pub fn slot_label(start: NaiveTime) -> String {
    let end = start + Duration::minutes(SLOT_MINUTES);
    format!("{}-{}", start.format(CLOCK_FORMAT), end.format(CLOCK_FORMAT))
}

/// Minute of the day at which the slot labelled `label` starts.
///
/// Both clock times of the label must parse, only the left-hand one is used
/// for ordering.
pub fn slot_start_minute(label: &str) -> BookingResult<u32> {
    let (start, end) = label
        .split_once('-')
        .ok_or_else(|| BookingError::InvalidLabel(label.to_string()))?;

    let start = parse_clock(label, start)?;
    parse_clock(label, end)?;

    Ok(start.hour() * 60 + start.minute())
}

fn parse_clock(label: &str, clock: &str) -> BookingResult<NaiveTime> {
    NaiveTime::parse_from_str(clock.trim(), CLOCK_FORMAT)
        .map_err(|_| BookingError::InvalidLabel(label.to_string()))
}

/// Remaining capacity per slot of a single event.
///
/// Serialized as a plain JSON object mapping slot label to seats, the shape
/// stored in an event's `available_slots` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityCalendar {
    pub(crate) slots: BTreeMap<String, u32>,
}

impl AvailabilityCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the calendar of an event running from `start` to `end`.
    ///
    /// There is one slot per whole hour of the window, each initialised to
    /// `capacity`. A trailing partial hour is not bookable. Labels carry no
    /// date, so the window must end no later than the midnight that follows
    /// `start`.
    pub fn for_window(start: DateTime<Utc>, end: DateTime<Utc>, capacity: u32) -> PubResult<Self> {
        if end <= start {
            return Err(PubError::Validation(
                "Event end time must be after its start time".to_string(),
            ));
        }

        let next_midnight = start
            .date_naive()
            .succ_opt()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| PubError::Validation("Event start date is out of range".to_string()))?;
        if end > next_midnight {
            return Err(PubError::Validation(
                "Event must not run past midnight".to_string(),
            ));
        }

        let hours = (end - start).num_minutes() / SLOT_MINUTES;
        if hours < 1 {
            return Err(PubError::Validation(
                "Event must last at least one hour".to_string(),
            ));
        }

        let first = start.time().with_second(0).and_then(|t| t.with_nanosecond(0));
        let first = first.ok_or_else(|| PubError::Validation("Invalid event start time".to_string()))?;

        let slots = (0..hours)
            .map(|hour| {
                let slot_start = first + Duration::minutes(hour * SLOT_MINUTES);
                (slot_label(slot_start), capacity)
            })
            .collect();

        Ok(Self { slots })
    }

    /// Adds or replaces a slot after checking its label.
    pub fn insert(&mut self, label: impl Into<String>, capacity: u32) -> BookingResult<Option<u32>> {
        let label = label.into();
        slot_start_minute(&label)?;
        Ok(self.slots.insert(label, capacity))
    }

    pub fn capacity(&self, label: &str) -> Option<u32> {
        self.slots.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.slots.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.slots.iter().map(|(label, capacity)| (label.as_str(), *capacity))
    }

    /// All labels ordered by the clock time their slot starts at.
    ///
    /// Ties on the start minute fall back to label order.
    pub fn chronological_labels(&self) -> BookingResult<Vec<String>> {
        let mut keyed = self
            .slots
            .keys()
            .map(|label| Ok((slot_start_minute(label)?, label.clone())))
            .collect::<BookingResult<Vec<_>>>()?;
        keyed.sort();

        Ok(keyed.into_iter().map(|(_, label)| label).collect())
    }

    /// Slots in chronological order.
    pub fn slots(&self) -> BookingResult<Vec<TimeSlot>> {
        Ok(self
            .chronological_labels()?
            .into_iter()
            .map(|label| {
                let capacity = self.slots[&label];
                TimeSlot { label, capacity }
            })
            .collect())
    }

    /// Copy of the calendar with every slot capped at `max`.
    pub fn clamped(&self, max: u32) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|(label, capacity)| (label.clone(), (*capacity).min(max)))
                .collect(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for AvailabilityCalendar {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(|(label, capacity)| (label.into(), capacity)).collect(),
        }
    }
}

impl From<BTreeMap<String, u32>> for AvailabilityCalendar {
    fn from(slots: BTreeMap<String, u32>) -> Self {
        Self { slots }
    }
}

impl From<AvailabilityCalendar> for BTreeMap<String, u32> {
    fn from(calendar: AvailabilityCalendar) -> Self {
        calendar.slots
    }
}
