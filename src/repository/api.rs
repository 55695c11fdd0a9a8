//! [`EventReader`] and [`EventWriter`] backed by the content API over HTTP.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::event::{Event, EventDraft};
use crate::domain::image::ImageUpload;
use crate::domain::types::EventId;
use crate::filter::encode_pairs;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{EventListQuery, EventReader, EventWriter};

/// Collection the event records live in on the content API.
const EVENTS_COLLECTION: &str = "events";

/// HTTP client for the content API.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct ApiRepository {
    client: Client,
    base_url: String,
}

impl ApiRepository {
    pub fn new(base_url: impl Into<String>) -> RepositoryResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|err| RepositoryError::Network(err.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn event_url(&self, id: EventId) -> String {
        self.url(&format!("{EVENTS_COLLECTION}/{id}"))
    }
}

/// Passes successful responses through and turns the rest into errors.
async fn check_status(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    log::warn!("Content API request failed with {status}: {body}");
    Err(RepositoryError::from_status(status, body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl EventReader for ApiRepository {
    async fn count_events(&self) -> RepositoryResult<usize> {
        let response = self
            .client
            .get(self.url(&format!("{EVENTS_COLLECTION}/count")))
            .send()
            .await?;
        read_json(response).await
    }

    async fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<Event>> {
        let query_string = encode_pairs(&query.to_query_pairs()?)?;
        let mut url = self.url(EVENTS_COLLECTION);
        if !query_string.is_empty() {
            url.push('?');
            url.push_str(&query_string);
        }

        log::debug!("Listing events: {url}");

        let response = self.client.get(url).send().await?;
        let records: Vec<serde_json::Value> = read_json(response).await?;

        // One malformed record must not take the whole page down.
        Ok(records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Event>(record) {
                Ok(event) => Some(event),
                Err(err) => {
                    log::warn!("Skipping malformed event record: {err}");
                    None
                }
            })
            .collect())
    }

    async fn get_event_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>> {
        let response = self.client.get(self.event_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }
}

#[async_trait]
impl EventWriter for ApiRepository {
    async fn update_event(
        &self,
        id: EventId,
        draft: &EventDraft,
        token: &str,
    ) -> RepositoryResult<Event> {
        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .client
            .put(self.event_url(id))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;
        read_json(response).await
    }

    async fn upload_event_image(
        &self,
        id: EventId,
        upload: ImageUpload,
        token: &str,
    ) -> RepositoryResult<()> {
        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .text("ref", EVENTS_COLLECTION)
            .text("refId", id.to_string())
            .text("field", "image")
            .part("files", part);

        let response = self
            .client
            .post(self.url("upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let repo = ApiRepository::with_client(Client::new(), "http://cms.local:1337/");

        assert_eq!(repo.base_url(), "http://cms.local:1337");
        assert_eq!(repo.url("events/count"), "http://cms.local:1337/events/count");
        assert_eq!(
            repo.event_url(EventId::new(5).unwrap()),
            "http://cms.local:1337/events/5"
        );
    }
}
