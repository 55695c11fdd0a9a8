//! In-process stand-in for the content API used by the integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

/// The only token the fake API accepts.
pub const VALID_TOKEN: &str = "valid-token";

/// Event name that makes the fake API fail the update with a 500.
pub const FAILING_NAME: &str = "explode";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub raw_query: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

pub struct FakeState {
    events: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeApi {
    pub base_url: String,
    state: web::Data<FakeState>,
}

impl FakeApi {
    /// Binds the fake API on an ephemeral port and serves it in the
    /// background of the current test runtime.
    pub async fn start(events: Vec<Value>) -> Self {
        let state = web::Data::new(FakeState {
            events: Mutex::new(events),
            requests: Mutex::new(Vec::new()),
        });

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .default_service(web::to(handle))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind fake content API");

        let address = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            base_url: format!("http://{address}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("lock poisoned").clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn event(&self, id: i64) -> Option<Value> {
        self.state
            .events
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|event| event["id"] == json!(id))
            .cloned()
    }
}

pub fn event_json(id: i64, name: &str, performers: &str, date: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "performers": performers,
        "venue": "Blue Room",
        "address": "1 Main St",
        "date": date,
        "time": "8:00 PM",
        "description": format!("{name} description"),
        "slug": slug,
        "image": null,
        "created_at": "2021-01-01T00:00:00.000Z"
    })
}

/// Ten events on consecutive days, listed out of date order.
pub fn ten_events() -> Vec<Value> {
    (1..=10)
        .rev()
        .map(|n| {
            event_json(
                n,
                &format!("Event {n:02}"),
                "Various",
                &format!("2021-06-{n:02}T00:00:00.000Z"),
                &format!("event-{n:02}"),
            )
        })
        .collect()
}

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn authorized(req: &HttpRequest) -> bool {
    header_value(req, header::AUTHORIZATION) == Some(format!("Bearer {VALID_TOKEN}"))
}

fn multipart_value(body: &str, marker: &str, terminator: &str) -> Option<String> {
    let start = body.find(marker)? + marker.len();
    let rest = &body[start..];
    let end = rest.find(terminator)?;
    Some(rest[..end].to_string())
}

fn text_matches(event: &Value, field: &str, needle: &str) -> bool {
    event[field]
        .as_str()
        .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}

fn list_events(events: &[Value], query: &[(String, String)]) -> Vec<Value> {
    let mut events = events.to_vec();

    let search: Vec<(String, String)> = query
        .iter()
        .filter(|(key, _)| key.starts_with("_where[_or]") && key.ends_with("_contains]"))
        .filter_map(|(key, value)| {
            let field = key.rsplit('[').next()?.strip_suffix("_contains]")?;
            Some((field.to_string(), value.clone()))
        })
        .collect();
    if !search.is_empty() {
        events.retain(|event| {
            search
                .iter()
                .any(|(field, needle)| text_matches(event, field, needle))
        });
    }

    if let Some((_, slug)) = query.iter().find(|(key, _)| key == "_where[slug_eq]") {
        events.retain(|event| event["slug"].as_str() == Some(slug.as_str()));
    }

    if query.iter().any(|(key, value)| key == "_sort" && value == "date:ASC") {
        events.sort_by(|a, b| a["date"].as_str().cmp(&b["date"].as_str()));
    }

    let number = |name: &str| {
        query
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.parse::<usize>().ok())
    };
    let start = number("_start").unwrap_or(0);
    let limit = number("_limit").unwrap_or(usize::MAX);

    events.into_iter().skip(start).take(limit).collect()
}

async fn handle(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    let query = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default();

    state
        .requests
        .lock()
        .expect("lock poisoned")
        .push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            raw_query: req.query_string().to_string(),
            query: query.clone(),
            authorization: header_value(&req, header::AUTHORIZATION),
            content_type: header_value(&req, header::CONTENT_TYPE),
            body: body.to_vec(),
        });

    let mut events = state.events.lock().expect("lock poisoned");
    let method = req.method().as_str();
    let segments: Vec<&str> = req.path().trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        ("GET", ["events", "count"]) => HttpResponse::Ok().json(events.len()),
        ("GET", ["events"]) => HttpResponse::Ok().json(list_events(&events, &query)),
        ("GET", ["events", id]) => match events.iter().find(|e| e["id"].to_string() == *id) {
            Some(event) => HttpResponse::Ok().json(event),
            None => HttpResponse::NotFound().json(json!({ "message": "Not Found" })),
        },
        ("PUT", ["events", id]) => {
            if !authorized(&req) {
                return HttpResponse::Unauthorized().json(json!({ "message": "Invalid token" }));
            }
            let Ok(Value::Object(changes)) = serde_json::from_slice::<Value>(&body) else {
                return HttpResponse::BadRequest().finish();
            };
            if changes.get("name") == Some(&json!(FAILING_NAME)) {
                return HttpResponse::InternalServerError().json(json!({ "message": "boom" }));
            }
            match events.iter_mut().find(|e| e["id"].to_string() == *id) {
                Some(event) => {
                    for (key, value) in changes {
                        event[key.as_str()] = value;
                    }
                    HttpResponse::Ok().json(event.clone())
                }
                None => HttpResponse::NotFound().finish(),
            }
        }
        ("POST", ["upload"]) => {
            if !authorized(&req) {
                return HttpResponse::Forbidden().json(json!({ "message": "Forbidden" }));
            }
            let body = String::from_utf8_lossy(&body);
            let ref_id = multipart_value(&body, "name=\"refId\"\r\n\r\n", "\r\n");
            let file_name = multipart_value(&body, "filename=\"", "\"");
            match (ref_id, file_name) {
                (Some(ref_id), Some(file_name)) => {
                    match events.iter_mut().find(|e| e["id"].to_string() == ref_id) {
                        Some(event) => {
                            event["image"] = json!({
                                "url": format!("/uploads/{file_name}"),
                                "formats": {
                                    "thumbnail": {
                                        "url": format!("/uploads/thumbnail_{file_name}")
                                    }
                                }
                            });
                            HttpResponse::Ok().json(json!([{ "name": file_name }]))
                        }
                        None => HttpResponse::NotFound().finish(),
                    }
                }
                _ => HttpResponse::BadRequest().finish(),
            }
        }
        _ => HttpResponse::NotFound().finish(),
    }
}
