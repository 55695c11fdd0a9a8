//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

pub mod events;

/// Notice rendered at the top of a page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub level: &'static str,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: alert_level_to_str(&Level::Error),
        }
    }
}

/// Maps a flash message level onto the CSS class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn collect_alerts(flash_messages: &IncomingFlashMessages) -> Vec<Alert> {
    flash_messages
        .iter()
        .map(|f| Alert {
            message: f.content().to_string(),
            level: alert_level_to_str(&f.level()),
        })
        .collect()
}

/// Context every page starts from: pending alerts and the active menu item.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let mut context = Context::new();
    context.insert("alerts", &collect_alerts(flash_messages));
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[get("/")]
pub async fn show_index() -> impl Responder {
    redirect("/events")
}

/// Registers every page route. `/events/search` must precede
/// `/events/{slug}` so that it is not read as a slug.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show_index)
        .service(events::show_events)
        .service(events::search_events)
        .service(events::show_edit_event)
        .service(events::save_event)
        .service(events::upload_event_image)
        .service(events::show_event);
}
