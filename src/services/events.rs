use futures_util::future::try_join;
use validator::Validate;

use crate::domain::event::EventDraft;
use crate::domain::image::{ImagePreview, ImageUpload};
use crate::domain::types::{EventId, EventSlug};
use crate::dto::events::{
    EditPageData, EventPageData, EventsPageData, SearchPageData, UpdateOutcome,
};
use crate::filter::Filter;
use crate::forms::events::EditEventForm;
use crate::pagination::PageRequest;
use crate::repository::{EventListQuery, EventReader, EventWriter, Sort};
use crate::services::{ServiceError, ServiceResult};

/// Notice shown when the edit form has an empty field.
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// Loads one page of events sorted by date together with the total count.
///
/// The count and the window are fetched concurrently; a page past the end
/// simply yields no events.
pub async fn load_events_page<R>(repo: &R, request: PageRequest) -> ServiceResult<EventsPageData>
where
    R: EventReader + ?Sized,
{
    let query = EventListQuery::new()
        .sort(Sort::asc("date"))
        .paginate(request);

    let (total, events) = try_join(repo.count_events(), repo.list_events(query))
        .await
        .map_err(|err| {
            log::error!("Failed to load events page {}: {err}", request.page());
            ServiceError::from(err)
        })?;

    Ok(EventsPageData {
        events,
        page: request.page(),
        total,
    })
}

/// Runs the free-text search across name, performers, description and venue.
///
/// A missing or blank term lists every event without a `_where` filter.
pub async fn search_events<R>(repo: &R, term: Option<&str>) -> ServiceResult<SearchPageData>
where
    R: EventReader + ?Sized,
{
    let term = term.map(str::trim).filter(|term| !term.is_empty());

    let query = match term {
        Some(term) => EventListQuery::new().filter(Filter::event_search(term)),
        None => EventListQuery::new(),
    };

    let events = repo.list_events(query).await.map_err(|err| {
        log::error!("Failed to search events for {term:?}: {err}");
        ServiceError::from(err)
    })?;

    Ok(SearchPageData { events })
}

/// Loads a single event by its slug.
pub async fn load_event_page<R>(repo: &R, slug: &str) -> ServiceResult<EventPageData>
where
    R: EventReader + ?Sized,
{
    let slug = EventSlug::new(slug)?;

    let query = EventListQuery::new().filter(Filter::eq("slug", slug.as_str()));
    let events = repo.list_events(query).await.map_err(|err| {
        log::error!("Failed to load event {slug}: {err}");
        ServiceError::from(err)
    })?;

    let event = events.into_iter().next().ok_or(ServiceError::NotFound)?;
    Ok(EventPageData { event })
}

/// Loads the event behind the edit form.
pub async fn load_edit_page<R>(
    repo: &R,
    event_id: i64,
    token: Option<String>,
) -> ServiceResult<EditPageData>
where
    R: EventReader + ?Sized,
{
    let event_id = EventId::new(event_id)?;

    let event = repo
        .get_event_by_id(event_id)
        .await
        .map_err(|err| {
            log::error!("Failed to load event {event_id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(EditPageData { event, token })
}

/// Validates the submitted draft and replaces the event with it.
///
/// An empty field rejects the submission before anything is sent. A missing
/// token is reported as [`ServiceError::Unauthorized`] without contacting the
/// API.
pub async fn update_event<R>(
    repo: &R,
    event_id: i64,
    form: &EditEventForm,
    token: Option<&str>,
) -> ServiceResult<UpdateOutcome>
where
    R: EventWriter + ?Sized,
{
    let event_id = EventId::new(event_id)?;

    if let Err(err) = form.validate() {
        log::warn!("Rejected edit of event {event_id}: {err}");
        return Err(ServiceError::Form(FILL_ALL_FIELDS.to_string()));
    }

    let token = token.ok_or(ServiceError::Unauthorized)?;
    let draft = EventDraft::from(form);

    let event = repo
        .update_event(event_id, &draft, token)
        .await
        .map_err(|err| {
            log::error!("Failed to update event {event_id}: {err}");
            ServiceError::from(err)
        })?;

    log::info!("Updated event {event_id}");

    Ok(UpdateOutcome { event })
}

/// Re-fetches the event and returns only its thumbnail URL.
pub async fn refresh_image_preview<R>(repo: &R, event_id: EventId) -> ServiceResult<ImagePreview>
where
    R: EventReader + ?Sized,
{
    let event = repo
        .get_event_by_id(event_id)
        .await
        .map_err(|err| {
            log::error!("Failed to reload event {event_id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(ImagePreview {
        image_preview: event.thumbnail_url().map(str::to_string),
    })
}

/// Uploads a new event image and returns the refreshed preview.
pub async fn upload_event_image<R>(
    repo: &R,
    event_id: i64,
    upload: ImageUpload,
    token: Option<&str>,
) -> ServiceResult<ImagePreview>
where
    R: EventReader + EventWriter + ?Sized,
{
    let event_id = EventId::new(event_id)?;
    let token = token.ok_or(ServiceError::Unauthorized)?;

    repo.upload_event_image(event_id, upload, token)
        .await
        .map_err(|err| {
            log::error!("Failed to upload image for event {event_id}: {err}");
            ServiceError::from(err)
        })?;

    refresh_image_preview(repo, event_id).await
}
