//! Lookup table of events by id.

use std::collections::BTreeMap;

use crate::event::Event;

/// Events keyed by id, as handed over by the event loader.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: BTreeMap<String, Event>,
}

impl EventCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, returning any event it replaced.
    pub fn insert(&mut self, event: Event) -> Option<Event> {
        self.events.insert(event.id.clone(), event)
    }

    /// Merge another category's events into this catalog.
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.insert(event);
        }
    }

    /// Look up an event.
    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    /// Check whether an id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    /// Events in a category.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.values().filter(move |e| e.category == category)
    }

    /// Ids of events that fail validation.
    pub fn invalid_ids(&self) -> Vec<&str> {
        self.events
            .values()
            .filter(|e| !e.is_valid())
            .map(|e| e.id.as_str())
            .collect()
    }

    /// All events in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the catalog holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<Event> for EventCatalog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}
