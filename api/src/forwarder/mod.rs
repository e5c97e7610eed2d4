use ticktick_to_notion::{notion::NotionPage, task::PayloadError};

pub mod service;

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}

impl std::fmt::Debug for ForwarderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum ForwarderError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Missing required field `{0}`")]
    SchemaViolation(&'static str),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<PayloadError> for ForwarderError {
    fn from(error: PayloadError) -> Self {
        match error {
            PayloadError::MalformedPayload(message) => ForwarderError::MalformedPayload(message),
            PayloadError::SchemaViolation(field) => ForwarderError::SchemaViolation(field),
        }
    }
}

/// What happened to a forwarded task. Only plumbing failures are errors.
#[derive(Debug, PartialEq, Clone)]
pub enum ForwardOutcome {
    Created(NotionPage),
    /// The caller did not present the configured authorization token
    Rejected,
    /// Notion refused the page, or could not be reached
    RemoteError { response: String, notified: bool },
}
