use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tera::Tera;

use crate::domain::event::{Event, EventDraft, EventField};
use crate::forms::events::{EditEventForm, UploadImageForm};
use crate::models::auth::AuthToken;
use crate::models::config::ServerConfig;
use crate::pagination::{PageLinks, PageRequest};
use crate::repository::ApiRepository;
use crate::routes::{Alert, base_context, collect_alerts, redirect, render_template};
use crate::services::{ServiceError, events as events_service};

/// Shown when the edit could not be saved for a reason other than auth or
/// validation.
const UPDATE_FAILED: &str = "Failed to update event";

#[derive(Deserialize)]
struct ListingParams {
    /// Kept as text so that a malformed value falls back to page 1 instead
    /// of rejecting the request.
    page: Option<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    term: Option<String>,
}

/// One input of the edit form.
#[derive(Serialize)]
struct FieldInput {
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    value: String,
}

fn field_inputs(draft: &EventDraft) -> Vec<FieldInput> {
    EventField::ALL
        .into_iter()
        .map(|field| {
            let (kind, value) = match field {
                EventField::Date => ("date", draft.date_input_value()),
                EventField::Description => ("textarea", draft.description.clone()),
                _ => ("text", draft.field(field).to_string()),
            };
            FieldInput {
                name: field.as_str(),
                label: field.label(),
                kind,
                value,
            }
        })
        .collect()
}

/// Everything the edit template binds. `event` is absent when the stored
/// record could not be reloaded after a failed save.
struct EditView<'a> {
    event_id: i64,
    event: Option<&'a Event>,
    token: Option<&'a str>,
    draft: &'a EventDraft,
}

fn render_edit_page(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    view: EditView<'_>,
    notice: Option<Alert>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "events");
    if let Some(notice) = notice {
        let mut alerts = collect_alerts(flash_messages);
        alerts.push(notice);
        context.insert("alerts", &alerts);
    }
    context.insert("event_id", &view.event_id);
    if let Some(event) = view.event {
        context.insert("event", event);
    }
    context.insert("token", &view.token);
    context.insert("fields", &field_inputs(view.draft));
    context.insert("image_preview", &view.event.and_then(Event::thumbnail_url));

    render_template(tera, "events/edit.html", &context)
}

#[get("/events")]
pub async fn show_events(
    params: web::Query<ListingParams>,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let request = PageRequest::from_param(params.page.as_deref(), server_config.per_page);

    match events_service::load_events_page(repo.get_ref(), request).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "events");
            context.insert("events", &data.events);
            context.insert("page", &data.page);
            context.insert("total", &data.total);
            context.insert("pagination", &PageLinks::new(request, data.total));

            render_template(&tera, "events/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render events listing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/events/search")]
pub async fn search_events(
    params: web::Query<SearchParams>,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let term = params.term.as_deref();

    match events_service::search_events(repo.get_ref(), term).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "events");
            context.insert("events", &data.events);
            context.insert("term", term.unwrap_or_default());

            render_template(&tera, "events/search.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render search results: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/events/edit/{event_id}")]
pub async fn show_edit_event(
    event_id: web::Path<i64>,
    token: AuthToken,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let event_id = event_id.into_inner();

    match events_service::load_edit_page(repo.get_ref(), event_id, token.into_inner()).await {
        Ok(data) => {
            let draft = EventDraft::from(&data.event);
            let view = EditView {
                event_id,
                event: Some(&data.event),
                token: data.token.as_deref(),
                draft: &draft,
            };
            render_edit_page(&tera, &flash_messages, view, None)
        }
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Event not found.").send();
            redirect("/events")
        }
        Err(err) => {
            log::error!("Failed to render edit page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/events/edit/{event_id}")]
pub async fn save_event(
    event_id: web::Path<i64>,
    token: AuthToken,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<EditEventForm>,
) -> impl Responder {
    let event_id = event_id.into_inner();

    let notice = match events_service::update_event(
        repo.get_ref(),
        event_id,
        &form,
        token.as_deref(),
    )
    .await
    {
        Ok(outcome) => {
            FlashMessage::success("Event updated.").send();
            return redirect(&outcome.redirect_url());
        }
        Err(ServiceError::Unauthorized) => Alert::error("Unauthorized"),
        Err(ServiceError::Form(message)) => Alert::error(message),
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Event not found.").send();
            return redirect("/events");
        }
        Err(err) => {
            log::error!("Failed to save event {event_id}: {err}");
            Alert::error(UPDATE_FAILED)
        }
    };

    // The submitted values stay in the form; only the event is reloaded.
    let draft = EventDraft::from(&form);
    let reloaded = match events_service::load_edit_page(repo.get_ref(), event_id, None).await {
        Ok(data) => Some(data),
        Err(err) => {
            log::warn!("Could not reload event {event_id} after rejected edit: {err}");
            None
        }
    };

    let view = EditView {
        event_id,
        event: reloaded.as_ref().map(|data| &data.event),
        token: token.as_deref(),
        draft: &draft,
    };
    render_edit_page(&tera, &flash_messages, view, Some(notice))
}

#[post("/events/{event_id}/image")]
pub async fn upload_event_image(
    event_id: web::Path<i64>,
    token: AuthToken,
    repo: web::Data<ApiRepository>,
    MultipartForm(form): MultipartForm<UploadImageForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => {
            log::warn!("Rejected image upload: {err}");
            return HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
        }
    };

    match events_service::upload_event_image(
        repo.get_ref(),
        event_id.into_inner(),
        upload,
        token.as_deref(),
    )
    .await
    {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))
        }
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            HttpResponse::NotFound().json(json!({ "error": "Event not found" }))
        }
        Err(err) => {
            log::error!("Failed to upload event image: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "Image upload failed" }))
        }
    }
}

#[get("/events/{slug}")]
pub async fn show_event(
    slug: web::Path<String>,
    token: AuthToken,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match events_service::load_event_page(repo.get_ref(), &slug).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "events");
            context.insert("event", &data.event);
            context.insert("can_edit", &token.as_deref().is_some());

            render_template(&tera, "events/show.html", &context)
        }
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Event not found.").send();
            redirect("/events")
        }
        Err(err) => {
            log::error!("Failed to render event page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
