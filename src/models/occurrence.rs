use chrono::{DateTime, TimeZone, Utc};

/// Millisecond-resolution key for an occurrence.
///
/// Two timestamps that differ only below the millisecond are the same occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OccurrenceKey(i64);

impl OccurrenceKey {
    pub fn from_date(date: &DateTime<Utc>) -> Self {
        Self(date.timestamp_millis())
    }

    pub fn to_date(&self) -> DateTime<Utc> {
        // Every key comes from a valid DateTime, so the round trip cannot fall out of range.
        Utc.timestamp_millis_opt(self.0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub date: DateTime<Utc>,
    pub attendees: Vec<String>,
}

impl Occurrence {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date: OccurrenceKey::from_date(&date).to_date(),
            attendees: Vec::new(),
        }
    }

    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey::from_date(&self.date)
    }

    pub fn has_attendee(&self, participant: &str) -> bool {
        self.attendees.iter().any(|a| a == participant)
    }
}
