use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{EventId, EventSlug};

/// Event record as returned by the content API.
///
/// Only the fields rendered or edited by the site are kept; anything else in
/// the payload is ignored. Text fields the API reports as `null` are read as
/// empty strings so the edit form always has a value to bind. A missing,
/// `null` or unusable slug leaves the event without a public address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: EventId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub performers: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub image: Option<EventImage>,
    #[serde(default, deserialize_with = "lenient_slug")]
    pub slug: Option<EventSlug>,
}

/// Uploaded media attached to an event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct EventImage {
    #[serde(default)]
    pub url: Option<String>,
    /// `null` for uploads the API does not derive variants from.
    #[serde(default, deserialize_with = "null_as_default")]
    pub formats: ImageFormats,
}

/// Derived variants the content API produces for an uploaded image.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ImageFormats {
    #[serde(default)]
    pub thumbnail: Option<ImageFormat>,
    #[serde(default)]
    pub small: Option<ImageFormat>,
    #[serde(default)]
    pub medium: Option<ImageFormat>,
    #[serde(default)]
    pub large: Option<ImageFormat>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageFormat {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Event {
    /// URL of the thumbnail variant, if the event has an image.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|image| image.formats.thumbnail.as_ref())
            .map(|format| format.url.as_str())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_slug<'de, D>(deserializer: D) -> Result<Option<EventSlug>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|slug| EventSlug::new(slug).ok()))
}

/// Editable fields of an event, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventField {
    Name,
    Performers,
    Venue,
    Address,
    Date,
    Time,
    Description,
}

impl EventField {
    pub const ALL: [EventField; 7] = [
        EventField::Name,
        EventField::Performers,
        EventField::Venue,
        EventField::Address,
        EventField::Date,
        EventField::Time,
        EventField::Description,
    ];

    /// Form field name, identical to the API attribute name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventField::Name => "name",
            EventField::Performers => "performers",
            EventField::Venue => "venue",
            EventField::Address => "address",
            EventField::Date => "date",
            EventField::Time => "time",
            EventField::Description => "description",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventField::Name => "Event Name",
            EventField::Performers => "Performers",
            EventField::Venue => "Venue",
            EventField::Address => "Address",
            EventField::Date => "Date",
            EventField::Time => "Time",
            EventField::Description => "Description",
        }
    }
}

/// Locally held copy of an event's editable fields.
///
/// Serializes to exactly the body sent with a full-replace update.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub performers: String,
    pub venue: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub description: String,
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            performers: event.performers.clone(),
            venue: event.venue.clone(),
            address: event.address.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            description: event.description.clone(),
        }
    }
}

impl EventDraft {
    pub fn field(&self, field: EventField) -> &str {
        match field {
            EventField::Name => &self.name,
            EventField::Performers => &self.performers,
            EventField::Venue => &self.venue,
            EventField::Address => &self.address,
            EventField::Date => &self.date,
            EventField::Time => &self.time,
            EventField::Description => &self.description,
        }
    }

    /// Date formatted for an `<input type="date">` element.
    ///
    /// The API stores full timestamps; values that do not parse are passed
    /// through unchanged so the user still sees what is stored.
    pub fn date_input_value(&self) -> String {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(&self.date) {
            return timestamp.format("%Y-%m-%d").to_string();
        }
        if let Ok(date) = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
        self.date.clone()
    }
}
