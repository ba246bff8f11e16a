//! The tracked-event collaborator seam.
//!
//! The engine never talks to a calendar service directly; callers supply a
//! [`TrackedEventStore`]. Writes carry the revision observed at fetch time so
//! a concurrent update surfaces as [`StoreError::Conflict`] instead of being
//! silently overwritten.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::reconcile::Window;

/// An externally stored event the engine creates or updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub id: String,
    pub name: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Bumped on every successful edit.
    #[serde(default)]
    pub revision: u64,
}

impl TrackedEvent {
    pub fn window(&self) -> Window {
        Window {
            start: self.start,
            end: self.end,
        }
    }

    /// Multi-line listing text with times shown in `tz`.
    pub fn summary(&self, tz: Tz) -> String {
        const FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";
        let location = if self.location.is_empty() {
            "No location specified"
        } else {
            self.location.as_str()
        };
        format!(
            "{}\nStart: {}\nEnd: {}\nLocation: {}\n",
            self.name,
            self.start.with_timezone(&tz).format(FORMAT),
            self.end.with_timezone(&tz).format(FORMAT),
            location
        )
    }
}

/// Fields for a new tracked event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrackedEvent {
    pub name: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
}

/// A partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventEdit {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl EventEdit {
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn window_and_description(window: Window, description: impl Into<String>) -> Self {
        Self {
            start: Some(window.start),
            end: Some(window.end),
            description: Some(description.into()),
        }
    }
}

/// Operations consumed from the tracked-event service.
pub trait TrackedEventStore {
    /// Events whose location falls within `venue_scope`.
    fn fetch_tracked_events(
        &self,
        venue_scope: &str,
    ) -> std::result::Result<Vec<TrackedEvent>, StoreError>;

    fn create_tracked_event(
        &mut self,
        event: NewTrackedEvent,
    ) -> std::result::Result<TrackedEvent, StoreError>;

    /// Apply `edit` only if the stored revision still equals `expected_revision`.
    fn edit_tracked_event(
        &mut self,
        id: &str,
        edit: EventEdit,
        expected_revision: u64,
    ) -> std::result::Result<TrackedEvent, StoreError>;
}

/// In-process store, serialisable to JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    events: Vec<TrackedEvent>,
    #[serde(default)]
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All events in insertion order.
    pub fn events(&self) -> &[TrackedEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&TrackedEvent> {
        self.events.iter().find(|event| event.id == id)
    }
}

impl TrackedEventStore for MemoryStore {
    /// An empty scope returns every event; otherwise the location must match
    /// case-insensitively.
    fn fetch_tracked_events(
        &self,
        venue_scope: &str,
    ) -> std::result::Result<Vec<TrackedEvent>, StoreError> {
        let scope = venue_scope.trim().to_lowercase();
        Ok(self
            .events
            .iter()
            .filter(|event| scope.is_empty() || event.location.to_lowercase() == scope)
            .cloned()
            .collect())
    }

    fn create_tracked_event(
        &mut self,
        event: NewTrackedEvent,
    ) -> std::result::Result<TrackedEvent, StoreError> {
        // Stores written by hand may lack `next_id`; skip ids already taken.
        let id = loop {
            self.next_id += 1;
            let id = format!("evt-{}", self.next_id);
            if self.get(&id).is_none() {
                break id;
            }
        };
        let created = TrackedEvent {
            id,
            name: event.name,
            location: event.location,
            start: event.start,
            end: event.end,
            description: event.description,
            revision: 0,
        };
        info!("created tracked event {} ({})", created.id, created.name);
        self.events.push(created.clone());
        Ok(created)
    }

    fn edit_tracked_event(
        &mut self,
        id: &str,
        edit: EventEdit,
        expected_revision: u64,
    ) -> std::result::Result<TrackedEvent, StoreError> {
        let event = self
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if event.revision != expected_revision {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected: expected_revision,
                actual: event.revision,
            });
        }

        if let Some(start) = edit.start {
            event.start = start;
        }
        if let Some(end) = edit.end {
            event.end = end;
        }
        if let Some(description) = edit.description {
            event.description = description;
        }
        event.revision += 1;
        info!("edited tracked event {} (revision {})", event.id, event.revision);
        Ok(event.clone())
    }
}
