use serde::{Deserialize, Serialize};

use crate::utils::chunk::split_in_chunks;

pub mod block;
pub mod builder;

pub use block::{ContentBlock, ContentBlockKind};
pub use builder::{PageBuilder, PriorityFieldKind, SchemaOptions};

/// Maximum length of the content of a single Notion rich text object
pub const NOTION_MAX_TEXT_LENGTH: usize = 2000;

/// Body of the Notion `POST /pages` request
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct PageCreationRequest {
    pub parent: PageParent,
    pub properties: PageProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ContentBlock>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct PageParent {
    pub database_id: String,
}

/// Properties of the target database, keyed by their column name
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PageProperties {
    pub task_name: TitleProperty,
    pub task_content: RichTextProperty,
    pub complete_date: DateProperty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<SelectProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_to_task: Option<UrlProperty>,
    pub created_at: DateProperty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<MultiSelectProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateProperty>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct RichText {
    pub text: TextContent,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct TextContent {
    pub content: String,
}

impl RichText {
    pub fn new(content: impl Into<String>) -> Self {
        RichText {
            text: TextContent {
                content: content.into(),
            },
        }
    }

    /// Split a text into as many rich text objects as Notion requires.
    /// An empty text gives no rich text object at all.
    pub fn runs(text: &str) -> Vec<RichText> {
        split_in_chunks(text, NOTION_MAX_TEXT_LENGTH)
            .into_iter()
            .map(RichText::new)
            .collect()
    }

    /// Same as [`RichText::runs`] but an empty text gives one empty object
    pub fn non_empty_runs(text: &str) -> Vec<RichText> {
        let runs = RichText::runs(text);
        if runs.is_empty() {
            vec![RichText::new("")]
        } else {
            runs
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct RichTextProperty {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct DateProperty {
    pub date: DateValue,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct DateValue {
    pub start: String,
}

impl DateProperty {
    pub fn new(start: String) -> Self {
        DateProperty {
            date: DateValue { start },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct SelectProperty {
    pub select: SelectOption,
}

impl SelectProperty {
    pub fn new(name: impl Into<String>) -> Self {
        SelectProperty {
            select: SelectOption { name: name.into() },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct MultiSelectProperty {
    pub multi_select: Vec<SelectOption>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct UrlProperty {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(untagged)]
pub enum PriorityProperty {
    Select(SelectProperty),
    RichText(RichTextProperty),
}

/// Envelope returned by the Notion API
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum NotionResponse {
    Page(NotionPage),
    Error(NotionError),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct NotionError {
    pub status: u16,
    pub code: String,
    pub message: String,
}
