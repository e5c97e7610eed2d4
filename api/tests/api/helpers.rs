use std::sync::Arc;

use reqwest::Response;
use rstest::*;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::info;
use wiremock::MockServer;

use ticktick_to_notion_api::configuration::Settings;

use crate::common::{build_and_spawn, mailer::MailerStub};

// Re-export shared fixtures so rstest can resolve them by name in this module's fixtures
pub use crate::common::{settings, tracing_setup};

pub struct TestedApp {
    pub app_address: String,
    pub api_address: String,
    pub notion_mock_server: MockServer,
    pub mailer_stub: Arc<RwLock<MailerStub>>,
}

#[fixture]
pub async fn tested_app(
    settings: Settings,
    #[allow(unused, clippy::let_unit_value)] tracing_setup: (),
) -> TestedApp {
    info!("Setting up server");
    let notion_mock_server = MockServer::start().await;
    let api_path = settings.application.api_path.clone();

    let (app_address, mailer_stub) = build_and_spawn(settings, &notion_mock_server).await;

    TestedApp {
        api_address: format!("{app_address}{api_path}"),
        app_address,
        notion_mock_server,
        mailer_stub,
    }
}

#[fixture]
pub fn task_payload() -> Value {
    json!({
        "authToken": "webhook_test_token",
        "TaskName": "Sample",
        "TaskContent": "line one\n---\nitem 1",
        "CompleteDate": "July 27 2022 at 05:10PM",
        "StartDate": "",
        "EndDate": "",
        "List": "Inbox",
        "Priority": "None",
        "Tag": "#Tag1 #Tag2",
        "LinkToTask": "https://ticktick.com/home",
        "CreatedAt": "July 25, 2022 at 09:20AM"
    })
}

pub async fn push_ticktick_task(app: &TestedApp, body: String) -> Response {
    reqwest::Client::new()
        .post(format!("{}/hooks/ticktick", app.api_address))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to execute request.")
}

pub async fn notion_requests_count(app: &TestedApp) -> usize {
    app.notion_mock_server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
