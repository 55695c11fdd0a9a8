use actix_cors::Cors;
use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;

pub mod domain;
pub mod dto;
pub mod filter;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod services;

pub use routes::configure;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // One HTTP client (and connection pool) for every worker.
    let repo = ApiRepository::new(&server_config.api_url).map_err(|e| {
        std::io::Error::other(format!("Failed to build content API client: {e}"))
    })?;

    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid secret: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Serving events from {} on {}:{}",
        repo.base_url(),
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
