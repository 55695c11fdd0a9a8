//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::event::{Event, EventDraft};
use crate::domain::image::ImageUpload;
use crate::domain::types::EventId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{EventListQuery, EventReader, EventWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl EventReader for Repository {
        async fn count_events(&self) -> RepositoryResult<usize>;
        async fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<Event>>;
        async fn get_event_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>>;
    }

    #[async_trait]
    impl EventWriter for Repository {
        async fn update_event(
            &self,
            id: EventId,
            draft: &EventDraft,
            token: &str,
        ) -> RepositoryResult<Event>;
        async fn upload_event_image(
            &self,
            id: EventId,
            upload: ImageUpload,
            token: &str,
        ) -> RepositoryResult<()>;
    }
}
