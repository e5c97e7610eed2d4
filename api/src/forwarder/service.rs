use std::sync::Arc;

use lettre::message::Mailbox;
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use ticktick_to_notion::{
    notion::{PageBuilder, PageCreationRequest},
    task::{TaskPayload, TaskRecord},
};

use crate::{
    forwarder::{ForwardOutcome, ForwarderError},
    integrations::notion::{NotionPageCreation, NotionService},
    mailer::{EmailTemplate, Mailer},
};

/// Turn incoming TickTick tasks into Notion pages
pub struct ForwarderService {
    page_builder: PageBuilder,
    database_id: String,
    auth_token: Option<Secret<String>>,
    notion_service: NotionService,
    mailer: Arc<RwLock<dyn Mailer + Send + Sync>>,
    recipient: Mailbox,
}

impl ForwarderService {
    pub fn new(
        page_builder: PageBuilder,
        database_id: String,
        auth_token: Option<Secret<String>>,
        notion_service: NotionService,
        mailer: Arc<RwLock<dyn Mailer + Send + Sync>>,
        recipient: Mailbox,
    ) -> Self {
        Self {
            page_builder,
            database_id,
            auth_token,
            notion_service,
            mailer,
            recipient,
        }
    }

    /// Build the page a payload would create, without calling Notion
    pub fn transform(&self, payload: &str) -> Result<PageCreationRequest, ForwarderError> {
        let task = TaskRecord::from_payload(payload)?;

        Ok(self.page_builder.build(&task, &self.database_id)?)
    }

    #[tracing::instrument(level = "info", skip_all, err)]
    pub async fn forward(&self, payload: &str) -> Result<ForwardOutcome, ForwarderError> {
        let payload = TaskPayload::parse(payload)?;

        if !self.is_authenticated(payload.auth_token()) {
            warn!("Rejecting task with an invalid authorization token");
            return Ok(ForwardOutcome::Rejected);
        }

        let task = TaskRecord::try_from(payload)?;
        let page = self.page_builder.build(&task, &self.database_id)?;

        let response = match self.notion_service.create_page(&page).await {
            Ok(NotionPageCreation::Created(page)) => {
                info!("Task `{}` forwarded to Notion page {}", task.task_name, page.id);
                return Ok(ForwardOutcome::Created(page));
            }
            Ok(NotionPageCreation::Rejected { response }) => {
                error!("Notion rejected task `{}`: {response}", task.task_name);
                response
            }
            Err(err) => {
                error!("Failed to reach Notion for task `{}`: {err:?}", task.task_name);
                err.to_string()
            }
        };

        let notified = self.notify_failure(&task, &response).await;

        Ok(ForwardOutcome::RemoteError { response, notified })
    }

    fn is_authenticated(&self, presented_token: Option<&str>) -> bool {
        let Some(expected_token) = &self.auth_token else {
            return true;
        };

        presented_token == Some(expected_token.expose_secret().as_str())
    }

    async fn notify_failure(&self, task: &TaskRecord, response: &str) -> bool {
        let template = EmailTemplate::NotionApiError {
            task_name: task.task_name.clone(),
            complete_date: task.complete_date.clone(),
            list: task.list.clone(),
            link_to_task: task.link_to_task.clone(),
            response: response.to_string(),
        };

        match self
            .mailer
            .read()
            .await
            .send_email(self.recipient.clone(), template)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to notify {} of the Notion error: {err:?}", self.recipient);
                false
            }
        }
    }
}
