pub mod health_check;
pub mod webhook;

use actix_http::{body::BoxBody, header::TryIntoHeaderValue, StatusCode};
use actix_web::{
    http::header::{self, ContentType},
    HttpResponse, ResponseError,
};
use serde_json::json;

use crate::forwarder::ForwarderError;

impl ResponseError for ForwarderError {
    fn status_code(&self) -> StatusCode {
        match self {
            ForwarderError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ForwarderError::SchemaViolation(_) => StatusCode::BAD_REQUEST,
            ForwarderError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let mut res = HttpResponse::new(self.status_code());

        res.headers_mut().insert(
            header::CONTENT_TYPE,
            ContentType::json().try_into_value().unwrap(),
        );

        res.set_body(BoxBody::new(
            json!({ "message": format!("{self}") }).to_string(),
        ))
    }
}
