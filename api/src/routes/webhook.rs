use std::sync::Arc;

use actix_web::{web, HttpResponse, Scope};
use serde_json::json;
use tracing::debug;

use crate::forwarder::{service::ForwarderService, ForwardOutcome, ForwarderError};

pub fn scope() -> Scope {
    web::scope("/hooks").service(web::resource("/ticktick").route(web::post().to(push_ticktick_task)))
}

/// The body is read as text: TickTick automations may send raw line breaks
/// inside `TaskContent`, which a JSON extractor would reject.
pub async fn push_ticktick_task(
    forwarder_service: web::Data<Arc<ForwarderService>>,
    body: String,
) -> Result<HttpResponse, ForwarderError> {
    debug!("Received a task from TickTick ({} bytes)", body.len());

    Ok(match forwarder_service.forward(&body).await? {
        ForwardOutcome::Created(page) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json!({ "page_id": page.id, "url": page.url }).to_string()),
        ForwardOutcome::Rejected => HttpResponse::Ok().finish(),
        ForwardOutcome::RemoteError { response, notified } => HttpResponse::BadGateway()
            .content_type("application/json")
            .body(
                json!({
                    "message": format!("Notion API error: {response}"),
                    "notified": notified
                })
                .to_string(),
            ),
    })
}
