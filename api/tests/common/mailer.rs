use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use tokio::sync::RwLock;

use ticktick_to_notion_api::{
    forwarder::ForwarderError,
    mailer::{EmailTemplate, Mailer},
};

#[derive(Debug)]
pub struct MailerStub {
    pub emails_sent: Arc<RwLock<Vec<(Mailbox, EmailTemplate)>>>,
}

impl MailerStub {
    pub fn new() -> Self {
        Self {
            emails_sent: Arc::new(RwLock::new(vec![])),
        }
    }
}

#[async_trait]
impl Mailer for MailerStub {
    async fn send_email(
        &self,
        recipient: Mailbox,
        template: EmailTemplate,
    ) -> Result<(), ForwarderError> {
        self.emails_sent.write().await.push((recipient, template));
        Ok(())
    }
}
