use std::{net::TcpListener, str::FromStr, sync::Arc};

use rstest::*;
use tokio::sync::RwLock;
use tracing::info;
use wiremock::MockServer;

use ticktick_to_notion_api::{
    configuration::Settings,
    observability::{get_subscriber, init_subscriber},
};

use crate::common::mailer::MailerStub;

pub mod mailer;

#[fixture]
#[once]
pub fn tracing_setup(settings: Settings) {
    info!("Setting up tracing");

    let subscriber = get_subscriber(&settings.application.observability.logging.log_directive);
    init_subscriber(
        subscriber,
        log::LevelFilter::from_str(
            &settings
                .application
                .observability
                .logging
                .dependencies_log_level,
        )
        .unwrap_or(log::LevelFilter::Error),
    );
    color_backtrace::install();
}

#[fixture]
pub fn settings() -> Settings {
    Settings::new_from_file(Some("config/test".to_string()))
        .expect("Cannot load test configuration")
}

/// Builds the forwarder against a mocked Notion API and spawns the server.
/// Returns (app_address, mailer_stub).
pub async fn build_and_spawn(
    settings: Settings,
    notion_mock_server: &MockServer,
) -> (String, Arc<RwLock<MailerStub>>) {
    // Use `let _ =` because `install_default` can only succeed once per process.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let mailer_stub = Arc::new(RwLock::new(MailerStub::new()));
    let forwarder_service = ticktick_to_notion_api::build_services(
        &settings,
        Some(format!("{}/v1", notion_mock_server.uri())),
        mailer_stub.clone(),
    )
    .expect("Failed to build the forwarder service");

    let server = ticktick_to_notion_api::run_server(listener, settings, forwarder_service)
        .await
        .expect("Failed to bind address");
    tokio::spawn(server);

    (format!("http://127.0.0.1:{port}"), mailer_stub)
}
