use std::{collections::BTreeSet, fmt};

use chrono::{Datelike, NaiveDate, NaiveTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("event title must not be empty")]
    EmptyTitle,
    #[error("event {0} not found")]
    UnknownEvent(EventId),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub version: u8,
    events: Vec<CalendarEvent>,
}

impl Calendar {
    pub const VERSION: u8 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn add_event(
        &mut self,
        title: &str,
        date: NaiveDate,
        time: NaiveTime,
        notes: &str,
    ) -> Result<&CalendarEvent, CalendarError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CalendarError::EmptyTitle);
        }

        let id = EventId(self.events.iter().map(|e| e.id.0).max().unwrap_or(0) + 1);
        self.events.push(CalendarEvent {
            id,
            title: title.to_string(),
            date,
            time,
            notes: notes.trim().to_string(),
        });
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn edit_event(
        &mut self,
        id: EventId,
        title: &str,
        time: NaiveTime,
        notes: &str,
    ) -> Result<&CalendarEvent, CalendarError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CalendarError::EmptyTitle);
        }

        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CalendarError::UnknownEvent(id))?;
        event.title = title.to_string();
        event.time = time;
        event.notes = notes.trim().to_string();
        Ok(&*event)
    }

    pub fn remove_event(&mut self, id: EventId) -> Result<CalendarEvent, CalendarError> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(CalendarError::UnknownEvent(id))?;
        Ok(self.events.remove(index))
    }

    /// Events on `date`, earliest first.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| e.date == date)
            .sorted_by_key(|e| (e.time, e.id))
            .collect()
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.date == date)
    }

    /// Days of the given month that carry at least one event.
    pub fn dates_with_events(&self, year: i32, month: u32) -> BTreeSet<NaiveDate> {
        self.events
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() == month)
            .map(|e| e.date)
            .collect()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}
