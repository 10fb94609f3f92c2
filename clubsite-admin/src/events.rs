//! Event list state for the admin tools

use chrono::{DateTime, Utc};
use clubsite_common::models::{Event, EventDraft, EventFilters};
use uuid::Uuid;

use crate::client::{AdminClient, ClientError};

#[derive(Debug, Default)]
pub struct EventsStore {
    events: Vec<Event>,
    current_event: Option<Event>,
    filters: EventFilters,
    error: Option<String>,
}

impl EventsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn current_event(&self) -> Option<&Event> {
        self.current_event.as_ref()
    }

    pub fn filters(&self) -> &EventFilters {
        &self.filters
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Events on or after `now`
    pub fn upcoming_events(&self, now: DateTime<Utc>) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date >= now).collect()
    }

    pub fn past_events(&self, now: DateTime<Utc>) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date < now).collect()
    }

    /// Events with a tag containing `tag`, ignoring case
    pub fn events_by_tag(&self, tag: &str) -> Vec<&Event> {
        let needle = tag.to_lowercase();
        self.events
            .iter()
            .filter(|e| e.tags.iter().any(|t| t.to_lowercase().contains(&needle)))
            .collect()
    }

    /// Merge in the filters that are set
    pub fn set_filters(&mut self, filters: EventFilters) {
        if filters.upcoming.is_some() {
            self.filters.upcoming = filters.upcoming;
        }
        if filters.tag.is_some() {
            self.filters.tag = filters.tag;
        }
        if filters.limit.is_some() {
            self.filters.limit = filters.limit;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = EventFilters::default();
    }

    pub fn set_current_event(&mut self, event: Event) {
        self.current_event = Some(event);
    }

    pub fn clear_current_event(&mut self) {
        self.current_event = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn record<T>(&mut self, result: Result<T, ClientError>, default: &str) -> Result<T, ClientError> {
        if let Err(e) = &result {
            self.error = Some(e.user_message(default));
        }
        result
    }

    fn sort_by_date(&mut self) {
        self.events.sort_by(|a, b| a.date.cmp(&b.date));
    }

    pub async fn fetch_events(
        &mut self,
        client: &AdminClient,
        filters: &EventFilters,
    ) -> Result<(), ClientError> {
        self.error = None;
        let result = client.list_events(filters).await;
        let response = self.record(result, "Failed to fetch events")?;
        self.events = response.data;
        Ok(())
    }

    pub async fn fetch_event(&mut self, client: &AdminClient, id: Uuid) -> Result<&Event, ClientError> {
        self.error = None;
        let result = client.get_event(id).await;
        let response = self.record(result, "Failed to fetch event")?;
        Ok(self.current_event.insert(response.data))
    }

    pub async fn create_event(
        &mut self,
        client: &AdminClient,
        draft: &EventDraft,
    ) -> Result<Event, ClientError> {
        self.error = None;
        let result = client.create_event(draft).await;
        let event = self.record(result, "Failed to create event")?.data;

        self.events.push(event.clone());
        self.sort_by_date();
        Ok(event)
    }

    pub async fn update_event(
        &mut self,
        client: &AdminClient,
        id: Uuid,
        draft: &EventDraft,
    ) -> Result<Event, ClientError> {
        self.error = None;
        let result = client.update_event(id, draft).await;
        let event = self.record(result, "Failed to update event")?.data;

        if let Some(slot) = self.events.iter_mut().find(|e| e.id == id) {
            *slot = event.clone();
        }
        if self.current_event.as_ref().is_some_and(|e| e.id == id) {
            self.current_event = Some(event.clone());
        }
        self.sort_by_date();
        Ok(event)
    }

    pub async fn delete_event(&mut self, client: &AdminClient, id: Uuid) -> Result<(), ClientError> {
        self.error = None;
        let result = client.delete_event(id).await;
        self.record(result, "Failed to delete event")?;

        self.events.retain(|e| e.id != id);
        if self.current_event.as_ref().is_some_and(|e| e.id == id) {
            self.current_event = None;
        }
        Ok(())
    }
}
