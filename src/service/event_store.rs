use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::models::occurrence::{Occurrence, OccurrenceKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("an occurrence already exists at {0}")]
    DuplicateOccurrence(DateTime<Utc>),
    #[error("no occurrence at {0}")]
    NoSuchOccurrence(DateTime<Utc>),
    #[error("no upcoming occurrence")]
    NoUpcomingOccurrence,
}

/// In-memory store of occurrences and their rosters.
///
/// Occurrences are keyed by their millisecond timestamp, so at most one exists per
/// instant and iteration is always in ascending date order. Reads never reorder
/// anything. "Next" is resolved against the `now` passed in on every call.
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    occurrences: BTreeMap<OccurrenceKey, Occurrence>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Creates an occurrence with an empty roster. Fails if one already exists at the same millisecond.
    pub fn add(&mut self, date: DateTime<Utc>) -> Result<Occurrence, StoreError> {
        let occurrence = Occurrence::new(date);
        let key = occurrence.key();
        if self.occurrences.contains_key(&key) {
            return Err(StoreError::DuplicateOccurrence(occurrence.date));
        }
        debug!(date = %occurrence.date, "adding occurrence");
        self.occurrences.insert(key, occurrence.clone());
        Ok(occurrence)
    }

    pub fn find_by_date(&self, date: &DateTime<Utc>) -> Option<&Occurrence> {
        self.occurrences.get(&OccurrenceKey::from_date(date))
    }

    pub fn sorted_all(&self) -> Vec<&Occurrence> {
        self.occurrences.values().collect()
    }

    /// Earliest occurrence strictly after `now`, if any.
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> Option<&Occurrence> {
        // Keys are floored to the millisecond, so comparing against floor(now) keeps `date > now` exact.
        self.occurrences
            .range((Excluded(OccurrenceKey::from_date(&now)), Unbounded))
            .map(|(_, occurrence)| occurrence)
            .next()
    }

    /// Signs `participant` up. Returns `false` without touching the roster when already signed up.
    pub fn add_participant(
        &mut self,
        participant: &str,
        date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let key = self.resolve(date, now)?;
        let Some(occurrence) = self.occurrences.get_mut(&key) else {
            return Err(StoreError::NoSuchOccurrence(key.to_date()));
        };
        if occurrence.has_attendee(participant) {
            return Ok(false);
        }
        debug!(date = %occurrence.date, participant, "adding participant");
        occurrence.attendees.push(participant.to_string());
        Ok(true)
    }

    pub fn list_participants(
        &self,
        date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        let key = self.resolve(date, now)?;
        self.occurrences
            .get(&key)
            .map(|occurrence| occurrence.attendees.clone())
            .ok_or_else(|| StoreError::NoSuchOccurrence(key.to_date()))
    }

    fn resolve(&self, date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<OccurrenceKey, StoreError> {
        match date {
            Some(date) => {
                let key = OccurrenceKey::from_date(&date);
                if self.occurrences.contains_key(&key) {
                    Ok(key)
                } else {
                    Err(StoreError::NoSuchOccurrence(key.to_date()))
                }
            }
            None => self
                .next_occurrence(now)
                .map(Occurrence::key)
                .ok_or(StoreError::NoUpcomingOccurrence),
        }
    }
}
