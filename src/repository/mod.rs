use async_trait::async_trait;

use crate::domain::event::{Event, EventDraft};
use crate::domain::image::ImageUpload;
use crate::domain::types::EventId;
use crate::filter::{Filter, FilterError};
use crate::pagination::PageRequest;
use crate::repository::errors::RepositoryResult;

pub mod api;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use api::ApiRepository;

/// Ascending order on a single field, sent as `_sort=<field>:ASC`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    fn to_param(&self) -> String {
        format!("{}:ASC", self.field)
    }
}

/// Window over the collection: `limit` items starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub limit: usize,
}

impl From<PageRequest> for Window {
    fn from(request: PageRequest) -> Self {
        Self {
            start: request.offset(),
            limit: request.per_page(),
        }
    }
}

/// Parameters for listing events from the content API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventListQuery {
    pub sort: Option<Sort>,
    pub window: Option<Window>,
    pub filter: Option<Filter>,
}

impl EventListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.window = Some(request.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Query pairs in the order the API documents them:
    /// `_sort`, `_limit`, `_start`, then the `_where` filter.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, FilterError> {
        let mut pairs = Vec::new();
        if let Some(sort) = &self.sort {
            pairs.push(("_sort".to_string(), sort.to_param()));
        }
        if let Some(window) = &self.window {
            pairs.push(("_limit".to_string(), window.limit.to_string()));
            pairs.push(("_start".to_string(), window.start.to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.extend(filter.to_query_pairs()?);
        }
        Ok(pairs)
    }
}

#[async_trait]
pub trait EventReader {
    /// Total number of events, as reported by the API.
    async fn count_events(&self) -> RepositoryResult<usize>;
    async fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<Event>>;
    async fn get_event_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>>;
}

#[async_trait]
pub trait EventWriter {
    /// Replaces the editable fields of an event with the draft.
    async fn update_event(
        &self,
        id: EventId,
        draft: &EventDraft,
        token: &str,
    ) -> RepositoryResult<Event>;

    /// Attaches an uploaded image to the event's `image` field.
    async fn upload_event_image(
        &self,
        id: EventId,
        upload: ImageUpload,
        token: &str,
    ) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &EventListQuery) -> Vec<(String, String)> {
        query.to_query_pairs().unwrap()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn listing_window_matches_page_scenarios() {
        for (page, start) in [(1, "0"), (2, "6"), (3, "12")] {
            let query = EventListQuery::new()
                .sort(Sort::asc("date"))
                .paginate(PageRequest::new(page, 6));

            assert_eq!(
                pairs(&query),
                vec![
                    pair("_sort", "date:ASC"),
                    pair("_limit", "6"),
                    pair("_start", start),
                ]
            );
        }
    }

    #[test]
    fn filter_pairs_follow_window_pairs() {
        let query = EventListQuery::new()
            .sort(Sort::asc("date"))
            .filter(Filter::eq("slug", "jazz-night"));

        assert_eq!(
            pairs(&query),
            vec![pair("_sort", "date:ASC"), pair("_where[slug_eq]", "jazz-night")]
        );
    }

    #[test]
    fn empty_filter_group_fails_the_query() {
        let query = EventListQuery::new().filter(Filter::Or(vec![]));

        assert!(matches!(query.to_query_pairs(), Err(FilterError::EmptyGroup(_))));
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(pairs(&EventListQuery::new()).is_empty());
    }
}
