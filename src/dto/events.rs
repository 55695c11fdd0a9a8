//! Page data handed to the event templates.
//!
//! Field names are part of the template contract: the listing template binds
//! `events`, `page` and `total`, the search template binds `events`, and the
//! edit template binds `event_id`, `event` and `token`.

use serde::Serialize;

use crate::domain::event::Event;

/// Data required to render the paginated events listing.
#[derive(Debug, Serialize)]
pub struct EventsPageData {
    /// Events in the requested window, sorted by date ascending.
    pub events: Vec<Event>,
    /// Page number the window was computed from.
    pub page: usize,
    /// Total events reported by the content API.
    pub total: usize,
}

/// Data required to render search results.
#[derive(Debug, Serialize)]
pub struct SearchPageData {
    pub events: Vec<Event>,
}

/// Data required to render the edit form.
#[derive(Debug, Serialize)]
pub struct EditPageData {
    pub event: Event,
    /// Bearer token from the `token` cookie, when the visitor is signed in.
    pub token: Option<String>,
}

/// Data required to render a single event.
#[derive(Debug, Serialize)]
pub struct EventPageData {
    pub event: Event,
}

/// Result of a successful update.
#[derive(Debug)]
pub struct UpdateOutcome {
    pub event: Event,
}

impl UpdateOutcome {
    /// Canonical address of the updated event, or the listing when the API
    /// returned it without a slug.
    pub fn redirect_url(&self) -> String {
        match &self.event.slug {
            Some(slug) => format!("/events/{slug}"),
            None => "/events".to_string(),
        }
    }
}
