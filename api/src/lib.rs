use std::{net::TcpListener, sync::Arc};

use actix_web::{
    dev::{Server, Service},
    http, web, App, HttpServer,
};
use anyhow::Context;
use lettre::message::Mailbox;
use tokio::sync::RwLock;
use tracing::info;
use tracing_actix_web::TracingLogger;

use ticktick_to_notion::notion::PageBuilder;

use crate::{
    configuration::Settings,
    forwarder::{service::ForwarderService, ForwarderError},
    integrations::notion::NotionService,
    mailer::Mailer,
};

pub mod configuration;
pub mod forwarder;
pub mod integrations;
pub mod mailer;
pub mod observability;
pub mod routes;
pub mod utils;

pub async fn run_server(
    listener: TcpListener,
    settings: Settings,
    forwarder_service: Arc<ForwarderService>,
) -> Result<Server, ForwarderError> {
    let api_path = settings.application.api_path.clone();
    let listen_address = listener
        .local_addr()
        .context("Failed to read the listening address")?;

    info!("Listening on {}", listen_address);

    let server = HttpServer::new(move || {
        info!("Mounting API on {}", api_path);

        let api_scope = web::scope(api_path.trim_end_matches('/'))
            .service(routes::webhook::scope())
            .app_data(web::Data::new(forwarder_service.clone()));

        App::new()
            .wrap_fn(move |req, srv| {
                let fut = srv.call(req);
                async move {
                    let res = fut.await?;
                    info!(
                        "{} {} {}",
                        res.request().method(),
                        res.request().uri().path(),
                        res.status()
                    );
                    Ok(res)
                }
            })
            .wrap(TracingLogger::default())
            .route("/ping", web::get().to(routes::health_check::ping))
            .service(api_scope)
    })
    .keep_alive(http::KeepAlive::Timeout(std::time::Duration::from_secs(60)))
    .shutdown_timeout(60)
    .listen(listener)
    .context(format!("Failed to listen on {listen_address}"))?;

    Ok(server.run())
}

pub fn build_services(
    settings: &Settings,
    notion_base_url: Option<String>,
    mailer: Arc<RwLock<dyn Mailer + Send + Sync>>,
) -> Result<Arc<ForwarderService>, ForwarderError> {
    let notion_base_url =
        notion_base_url.or_else(|| settings.notion.base_url.as_ref().map(|url| url.to_string()));
    let notion_service = NotionService::new(
        notion_base_url,
        &settings.notion.api_token,
        Some(settings.notion.api_version()),
    )?;

    let recipient = settings
        .notification
        .recipient
        .parse::<Mailbox>()
        .with_context(|| {
            format!(
                "Failed to parse notification recipient {}",
                settings.notification.recipient
            )
        })?;

    Ok(Arc::new(ForwarderService::new(
        PageBuilder::new(settings.schema.clone()),
        settings.notion.database_id.clone(),
        settings.webhook.expected_auth_token(),
        notion_service,
        mailer,
        recipient,
    )))
}
