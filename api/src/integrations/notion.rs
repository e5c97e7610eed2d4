use anyhow::Context;
use http::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, Secret};
use serde_json::json;
use tracing::debug;
use url::Url;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use ticktick_to_notion::notion::{NotionPage, NotionResponse, PageCreationRequest};

use crate::{
    configuration::{DEFAULT_NOTION_API_VERSION, DEFAULT_NOTION_BASE_URL},
    forwarder::ForwarderError,
    utils::api::{ApiClient, ApiClientError},
};

pub struct NotionService {
    client: ApiClient,
    pub notion_base_url: String,
}

/// Result of a page creation call that reached Notion
#[derive(Debug, PartialEq, Clone)]
pub enum NotionPageCreation {
    Created(NotionPage),
    /// Notion answered with an error envelope, kept verbatim
    Rejected { response: String },
}

impl NotionService {
    pub fn new(
        notion_base_url: Option<String>,
        api_token: &Secret<String>,
        api_version: Option<&str>,
    ) -> Result<NotionService, ForwarderError> {
        let notion_base_url = notion_base_url
            .unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Url::parse(&notion_base_url).context("Cannot parse Notion base URL")?;

        let mut headers = HeaderMap::new();
        let mut auth_header_value: HeaderValue =
            format!("Bearer {}", api_token.expose_secret())
                .parse()
                .context("Cannot build Notion authorization header")?;
        auth_header_value.set_sensitive(true);
        headers.insert("Authorization", auth_header_value);
        headers.insert(
            "Notion-Version",
            api_version
                .unwrap_or(DEFAULT_NOTION_API_VERSION)
                .parse()
                .context("Cannot build Notion version header")?,
        );

        Ok(NotionService {
            client: ApiClient::build(headers)?,
            notion_base_url,
        })
    }

    pub async fn mock_create_page(mock_server: &MockServer, base_path: &str, page_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("{base_path}/pages")))
            .and(header("Notion-Version", DEFAULT_NOTION_API_VERSION))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_json(json!({
                        "object": "page",
                        "id": page_id,
                        "url": format!("https://www.notion.so/{}", page_id.replace('-', "")),
                        "properties": {}
                    })),
            )
            .mount(mock_server)
            .await;
    }

    pub async fn mock_create_page_error(
        mock_server: &MockServer,
        base_path: &str,
        status: u16,
        message: &str,
    ) {
        Mock::given(method("POST"))
            .and(path(format!("{base_path}/pages")))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("content-type", "application/json")
                    .set_body_json(json!({
                        "object": "error",
                        "status": status,
                        "code": "validation_error",
                        "message": message
                    })),
            )
            .mount(mock_server)
            .await;
    }

    /// Submit a page to the configured database.
    ///
    /// Transport failures are returned as errors, error envelopes are not.
    #[tracing::instrument(level = "debug", skip_all, fields(database_id = %request.parent.database_id), err)]
    pub async fn create_page(
        &self,
        request: &PageCreationRequest,
    ) -> Result<NotionPageCreation, ApiClientError> {
        let response = self
            .client
            .post::<NotionResponse, _, _>(format!("{}/pages", self.notion_base_url), Some(request))
            .await;

        match response {
            Ok(NotionResponse::Page(page)) => {
                debug!("Notion page {} created", page.id);
                Ok(NotionPageCreation::Created(page))
            }
            Ok(error @ NotionResponse::Error(_)) => Ok(NotionPageCreation::Rejected {
                response: serde_json::to_string(&error)
                    .context("Cannot serialize Notion error response")?,
            }),
            Err(ApiClientError::ErrorResponse { body, .. }) => {
                Ok(NotionPageCreation::Rejected { response: body })
            }
            Err(err) => Err(err),
        }
    }
}
