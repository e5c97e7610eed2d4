use anyhow::Context;
use format_serde_error::SerdeError;
use http::HeaderMap;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Error as MiddlewareError};
// Use the reqwest version re-exported by reqwest-middleware to ensure type
// compatibility with the middleware client.
use reqwest_middleware::reqwest::{IntoUrl, Response};
use reqwest_tracing::{SpanBackendWithUrl, TracingMiddleware};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::forwarder::ForwarderError;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest_middleware::reqwest::Error),

    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] MiddlewareError),

    #[error("Json parsing error: {0}")]
    JsonParsingError(#[from] SerdeError),

    #[error("API returned an error response with status {status}: {body}")]
    ErrorResponse { status: u16, body: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiClientError {
    pub fn from_json_serde_error(serde_error: serde_json::Error, input: String) -> Self {
        ApiClientError::JsonParsingError(SerdeError::new(input, serde_error))
    }
}

/// HTTP client sending JSON requests with tracing spans.
///
/// Requests are never retried: a failed call is reported to the caller.
pub struct ApiClient {
    client: ClientWithMiddleware,
}

impl ApiClient {
    pub fn build(default_headers: HeaderMap) -> Result<Self, ForwarderError> {
        let client = ClientBuilder::new(
            reqwest_middleware::reqwest::Client::builder()
                .default_headers(default_headers)
                .user_agent(APP_USER_AGENT)
                .build()
                .context("Cannot build client")?,
        )
        .with(TracingMiddleware::<SpanBackendWithUrl>::new())
        .build();

        Ok(Self { client })
    }

    /// Return the response body, or the error body when the status is not a success
    async fn handle_response(
        &self,
        response: Result<Response, MiddlewareError>,
    ) -> Result<String, ApiClientError> {
        let response = response.map_err(ApiClientError::MiddlewareError)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiClientError::NetworkError)?;

        if !status.is_success() {
            return Err(ApiClientError::ErrorResponse {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    pub async fn post<R: DeserializeOwned, U: IntoUrl, T: Serialize + ?Sized>(
        &self,
        url: U,
        request_body: Option<&T>,
    ) -> Result<R, ApiClientError> {
        let mut response_builder = self.client.post(url);
        if let Some(body) = request_body {
            response_builder = response_builder.json(body);
        }
        let response = response_builder.send().await;

        let response_body = self.handle_response(response).await?;

        serde_json::from_str(&response_body)
            .map_err(|err| ApiClientError::from_json_serde_error(err, response_body.clone()))
    }
}
