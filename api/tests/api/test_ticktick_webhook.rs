use http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::{json, Value};

use ticktick_to_notion_api::{integrations::notion::NotionService, mailer::EmailTemplate};

use crate::helpers::{
    notion_requests_count, push_ticktick_task, task_payload, tested_app, TestedApp,
};

#[rstest]
#[tokio::test]
async fn test_push_ticktick_task_creates_notion_page(
    #[future] tested_app: TestedApp,
    task_payload: Value,
) {
    let app = tested_app.await;
    NotionService::mock_create_page(
        &app.notion_mock_server,
        "/v1",
        "59833787-2cf9-4fdf-8782-e53db20768a5",
    )
    .await;

    let response = push_ticktick_task(&app, task_payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "page_id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "url": "https://www.notion.so/598337872cf94fdf8782e53db20768a5"
        })
    );

    let requests = app.notion_mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let notion_request: Value = requests[0].body_json().unwrap();
    assert_eq!(notion_request["parent"], json!({ "database_id": "test-database-id" }));
    assert_eq!(
        notion_request["properties"]["CompleteDate"],
        json!({ "date": { "start": "2022-07-27T17:10:00.000+09:00" } })
    );
    assert_eq!(
        notion_request["properties"]["Tag"],
        json!({ "multi_select": [{ "name": "Tag1" }, { "name": "Tag2" }] })
    );
    assert!(notion_request["properties"].get("StartDate").is_none());
    assert_eq!(
        requests[0]
            .headers
            .get("Authorization")
            .and_then(|value| value.to_str().ok()),
        Some("Bearer notion_test_token")
    );

    assert!(app.mailer_stub.read().await.emails_sent.read().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_push_ticktick_task_with_raw_line_breaks(#[future] tested_app: TestedApp) {
    let app = tested_app.await;
    NotionService::mock_create_page(&app.notion_mock_server, "/v1", "page-id").await;
    let payload = "{\"authToken\":\"webhook_test_token\",\"TaskName\":\"Sample\",\
                   \"TaskContent\":\"line one\r\n---\r\nitem 1\",\
                   \"CompleteDate\":\"July 27 2022 at 05:10PM\",\
                   \"CreatedAt\":\"July 25, 2022 at 09:20AM\"}";

    let response = push_ticktick_task(&app, payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let requests = app.notion_mock_server.received_requests().await.unwrap();
    let notion_request: Value = requests[0].body_json().unwrap();
    assert_eq!(
        notion_request["children"],
        json!([
            {
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": [{ "text": { "content": "line one" } }] }
            },
            {
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": [] }
            },
            {
                "object": "block",
                "type": "to_do",
                "to_do": { "rich_text": [{ "text": { "content": "item 1" } }], "checked": true }
            }
        ])
    );
}

#[rstest]
#[tokio::test]
async fn test_push_ticktick_task_with_notion_error(
    #[future] tested_app: TestedApp,
    task_payload: Value,
) {
    let app = tested_app.await;
    NotionService::mock_create_page_error(
        &app.notion_mock_server,
        "/v1",
        400,
        "body failed validation: body.properties.List.select.name should be a string",
    )
    .await;

    let response = push_ticktick_task(&app, task_payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["notified"], json!(true));

    let mailer_stub = app.mailer_stub.read().await;
    let emails_sent = mailer_stub.emails_sent.read().await;
    assert_eq!(emails_sent.len(), 1);
    let (recipient, template) = &emails_sent[0];
    assert_eq!(recipient.email.to_string(), "owner@example.com");
    assert_eq!(template.subject(), "[ERROR] Notion API Error");
    let EmailTemplate::NotionApiError {
        task_name,
        complete_date,
        list,
        link_to_task,
        response,
    } = template;
    assert_eq!(task_name, "Sample");
    assert_eq!(complete_date, "July 27 2022 at 05:10PM");
    assert_eq!(list, "Inbox");
    assert_eq!(link_to_task, "https://ticktick.com/home");
    let response: Value = serde_json::from_str(response).unwrap();
    assert_eq!(response["object"], "error");
}

#[rstest]
#[case::missing_token(None)]
#[case::wrong_token(Some("not_the_token"))]
#[tokio::test]
async fn test_push_ticktick_task_with_invalid_token(
    #[future] tested_app: TestedApp,
    mut task_payload: Value,
    #[case] auth_token: Option<&str>,
) {
    let app = tested_app.await;
    match auth_token {
        Some(auth_token) => task_payload["authToken"] = json!(auth_token),
        None => {
            task_payload.as_object_mut().unwrap().remove("authToken");
        }
    }

    let response = push_ticktick_task(&app, task_payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");
    assert_eq!(notion_requests_count(&app).await, 0);
    assert!(app.mailer_stub.read().await.emails_sent.read().await.is_empty());
}

#[rstest]
#[case::invalid_json("{ \"TaskName\": ".to_string())]
#[case::not_an_object("[]".to_string())]
#[case::invalid_date(
    json!({
        "authToken": "webhook_test_token",
        "TaskName": "Sample",
        "TaskContent": "",
        "CompleteDate": "someday",
        "CreatedAt": "July 25, 2022 at 09:20AM"
    })
    .to_string()
)]
#[tokio::test]
async fn test_push_malformed_ticktick_task(#[future] tested_app: TestedApp, #[case] body: String) {
    let app = tested_app.await;

    let response = push_ticktick_task(&app, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Malformed payload"));
    assert_eq!(notion_requests_count(&app).await, 0);
}

#[rstest]
#[case::task_name("TaskName")]
#[case::complete_date("CompleteDate")]
#[case::created_at("CreatedAt")]
#[tokio::test]
async fn test_push_ticktick_task_without_required_field(
    #[future] tested_app: TestedApp,
    mut task_payload: Value,
    #[case] field: &str,
) {
    let app = tested_app.await;
    task_payload.as_object_mut().unwrap().remove(field);

    let response = push_ticktick_task(&app, task_payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "message": format!("Missing required field `{field}`") })
    );
    assert_eq!(notion_requests_count(&app).await, 0);
    assert!(app.mailer_stub.read().await.emails_sent.read().await.is_empty());
}

#[rstest]
#[case::missing_token(None)]
#[case::wrong_token(Some("not_the_token"))]
#[tokio::test]
async fn test_push_ticktick_task_with_invalid_token_and_without_task_name(
    #[future] tested_app: TestedApp,
    mut task_payload: Value,
    #[case] auth_token: Option<&str>,
) {
    let app = tested_app.await;
    let fields = task_payload.as_object_mut().unwrap();
    fields.remove("TaskName");
    match auth_token {
        Some(auth_token) => {
            fields.insert("authToken".to_string(), json!(auth_token));
        }
        None => {
            fields.remove("authToken");
        }
    }

    let response = push_ticktick_task(&app, task_payload.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");
    assert_eq!(notion_requests_count(&app).await, 0);
    assert!(app.mailer_stub.read().await.emails_sent.read().await.is_empty());
}
