use std::fmt::Debug;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::forwarder::ForwarderError;

pub static DEFAULT_SENDER_NAME: &str = "TickTick to Notion";

#[async_trait]
pub trait Mailer {
    async fn send_email(
        &self,
        recipient: Mailbox,
        template: EmailTemplate,
    ) -> Result<(), ForwarderError>;
}

#[derive(Serialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
pub enum EmailTemplate {
    NotionApiError {
        task_name: String,
        complete_date: String,
        list: String,
        link_to_task: String,
        response: String,
    },
}

impl EmailTemplate {
    pub fn subject(&self) -> String {
        match self {
            EmailTemplate::NotionApiError { .. } => "[ERROR] Notion API Error".to_string(),
        }
    }

    pub fn build_email_body(&self) -> String {
        match self {
            EmailTemplate::NotionApiError {
                task_name,
                complete_date,
                list,
                link_to_task,
                response,
            } => format!(
                "There is an error in the TickTick to Notion webhook.\n\n\
                 [TaskName] : {task_name}\n\
                 [CompleteDate] : {complete_date}\n\
                 [List] : {list}\n\
                 [Link] : {link_to_task}\n\n\
                 [Response] : \n{response}"
            ),
        }
    }
}

/// Build the `From` header out of a display name and an address
pub fn build_from_mailbox(sender_name: &str, from_header: &str) -> Result<Mailbox, ForwarderError> {
    let address: Address = from_header
        .parse()
        .with_context(|| format!("Failed to parse sender address {from_header}"))?;
    let name = (!sender_name.is_empty()).then(|| sender_name.to_string());

    Ok(Mailbox::new(name, address))
}

pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_header: Mailbox,
}

impl SmtpMailer {
    pub fn build(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: Secret<String>,
        from_header: Mailbox,
    ) -> Result<Self, ForwarderError> {
        let creds = Credentials::new(smtp_username, smtp_password.expose_secret().to_string());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_server)
            .with_context(|| format!("Failed to connect to SMTP server {smtp_server}"))?
            .credentials(creds)
            .port(smtp_port)
            .build();

        Ok(Self {
            mailer,
            from_header,
        })
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(email_subject = template.subject()),
        err
    )]
    fn build_email(
        &self,
        recipient: Mailbox,
        template: &EmailTemplate,
    ) -> Result<Message, ForwarderError> {
        Ok(Message::builder()
            .from(self.from_header.clone())
            .to(recipient)
            .subject(template.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(template.build_email_body())
            .context("Failed to build email")?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[allow(clippy::blocks_in_conditions)]
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(recipient = %recipient, template = template.subject()),
        err
    )]
    async fn send_email(
        &self,
        recipient: Mailbox,
        template: EmailTemplate,
    ) -> Result<(), ForwarderError> {
        let email = self.build_email(recipient, &template)?;

        self.mailer
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }
}
