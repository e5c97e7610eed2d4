use serde::Deserialize;

pub mod date;
pub mod payload;

pub use date::{TaskDate, TaskDateParseError};

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum PayloadError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Missing required field `{0}` in payload")]
    SchemaViolation(&'static str),
}

/// A task as exported by a TickTick automation.
///
/// Optional text fields are empty when the export did not provide them.
#[derive(Debug, PartialEq, Clone, Eq, Default)]
pub struct TaskRecord {
    pub task_name: String,
    pub task_content: String,
    pub complete_date: String,
    pub start_date: String,
    pub end_date: String,
    pub list: String,
    pub priority: String,
    pub tag: String,
    pub link_to_task: String,
    pub created_at: String,
    pub auth_token: Option<String>,
}

/// A TickTick export body once parsed, before any field is required.
#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct TaskPayload {
    task_name: Option<String>,
    task_content: Option<String>,
    complete_date: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    list: Option<String>,
    priority: Option<String>,
    tag: Option<String>,
    link_to_task: Option<String>,
    created_at: Option<String>,
    #[serde(rename = "authToken")]
    auth_token: Option<String>,
}

impl TaskPayload {
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

impl TryFrom<TaskPayload> for TaskRecord {
    type Error = PayloadError;

    fn try_from(raw: TaskPayload) -> Result<Self, Self::Error> {
        Ok(TaskRecord {
            task_name: raw
                .task_name
                .ok_or(PayloadError::SchemaViolation("TaskName"))?,
            task_content: normalize_newlines(&raw.task_content.unwrap_or_default()),
            complete_date: raw
                .complete_date
                .ok_or(PayloadError::SchemaViolation("CompleteDate"))?,
            start_date: raw.start_date.unwrap_or_default(),
            end_date: raw.end_date.unwrap_or_default(),
            list: raw.list.unwrap_or_default(),
            priority: raw.priority.unwrap_or_default(),
            tag: raw.tag.unwrap_or_default(),
            link_to_task: raw.link_to_task.unwrap_or_default(),
            created_at: raw
                .created_at
                .ok_or(PayloadError::SchemaViolation("CreatedAt"))?,
            auth_token: raw.auth_token,
        })
    }
}

pub(crate) fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}
