use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::occurrence::Occurrence;
use crate::service::event_store::StoreError;

pub const LARGE_ROSTER: usize = 10;
pub const UNEVEN_TEAMS_FROM: usize = 6;

const LARGE_ROSTER_NOTICE: &str = "Hmm. That's over ten.";
const UNEVEN_TEAMS_NOTICE: &str = "Someone needs to make these teams even.";

/// Builds every reply the bot sends. Dates are rendered in the configured display timezone.
#[derive(Debug, Clone, Copy)]
pub struct MessageService {
    timezone: Tz,
}

impl Default for MessageService {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl MessageService {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Relative rendering such as "today at 17:00" or "on Friday at 18:30".
    pub fn calendar(&self, date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
        let local = date.with_timezone(&self.timezone);
        let local_now = now.with_timezone(&self.timezone);
        let days = (local.date_naive() - local_now.date_naive()).num_days();
        let time = local.format("%H:%M");
        match days {
            0 => format!("today at {}", time),
            1 => format!("tomorrow at {}", time),
            -1 => format!("yesterday at {}", time),
            2..=6 => format!("on {} at {}", local.format("%A"), time),
            -6..=-2 => format!("last {} at {}", local.format("%A"), time),
            _ => format!("on {} at {}", local.format("%d/%m/%Y"), time),
        }
    }

    pub fn short_date(&self, date: &DateTime<Utc>) -> String {
        date.with_timezone(&self.timezone)
            .format("%b %-d, %Y %-I:%M %p")
            .to_string()
    }

    pub fn long_date(&self, date: &DateTime<Utc>) -> String {
        date.with_timezone(&self.timezone)
            .format("%a, %b %-d, %Y %-I:%M %p")
            .to_string()
    }

    pub fn occurrence_created(&self, date: &DateTime<Utc>) -> String {
        format!("Ok, I'll see who can play on {}.", self.short_date(date))
    }

    pub fn duplicate_occurrence(&self, date: &DateTime<Utc>) -> String {
        format!("There's already a game on {}.", self.short_date(date))
    }

    /// Reply for a create request the store refused.
    pub fn occurrence_not_added(&self, err: &StoreError, requested: &DateTime<Utc>) -> String {
        match err {
            StoreError::DuplicateOccurrence(existing) => self.duplicate_occurrence(existing),
            _ => format!("Sorry, I couldn't schedule the game on {}.", self.short_date(requested)),
        }
    }

    pub fn reminder(&self) -> String {
        "@here time to go. Since we're here anyway, we might actually play a bit of football.".to_string()
    }

    pub fn unauthorized(&self, name: &str) -> String {
        format!("Sorry {}, only organisers can schedule games.", name)
    }

    pub fn signed_up(&self, name: &str, date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
        format!("Great {}, you're signed up for the game {}!", name, self.calendar(date, now))
    }

    pub fn already_signed_up(&self, name: &str) -> String {
        format!("You've already signed up {}.", name)
    }

    pub fn nothing_to_join(&self) -> String {
        "There's no upcoming game to sign up for yet.".to_string()
    }

    pub fn next_occurrence(&self, next: Option<&Occurrence>, now: &DateTime<Utc>) -> String {
        match next {
            Some(occurrence) => format!("The next game is {}.", self.calendar(&occurrence.date, now)),
            None => "There's no upcoming game planned.".to_string(),
        }
    }

    pub fn fixture_list(&self, occurrences: &[&Occurrence]) -> String {
        if occurrences.is_empty() {
            return "There are no games planned.".to_string();
        }
        let mut body = if occurrences.len() == 1 {
            "There is 1 planned:\n\n".to_string()
        } else {
            format!("There are {} planned:\n\n", occurrences.len())
        };
        for occurrence in occurrences {
            body.push_str(&format!("• {}\n", self.long_date(&occurrence.date)));
        }
        body
    }

    pub fn no_upcoming_roster(&self) -> String {
        "There's no upcoming game, so nobody is playing yet.".to_string()
    }

    pub fn attendees(&self, attendees: &[String], date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
        let when = self.calendar(date, now);
        let mut body = match attendees {
            [] => "Nobody has signed up yet!".to_string(),
            [only] => format!("So far, just {} is playing {}.", only, when),
            many => format!(
                "So far we've got {} - {} for the game {}.",
                many.len(),
                nice_list(many),
                when
            ),
        };
        if let Some(notice) = roster_advisory(attendees.len()) {
            body.push(' ');
            body.push_str(notice);
        }
        body
    }
}

/// At most one notice; the large-roster notice wins over the uneven-teams one.
pub fn roster_advisory(size: usize) -> Option<&'static str> {
    if size >= LARGE_ROSTER {
        Some(LARGE_ROSTER_NOTICE)
    } else if size >= UNEVEN_TEAMS_FROM && size % 2 != 0 {
        Some(UNEVEN_TEAMS_NOTICE)
    } else {
        None
    }
}

/// "a", "a and b", "a, b and c".
pub fn nice_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}
