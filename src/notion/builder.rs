use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::task::{PayloadError, TaskDate, TaskRecord};

use super::{
    block::{segment_content, trim_one_newline},
    DateProperty, MultiSelectProperty, PageCreationRequest, PageParent, PageProperties,
    PriorityProperty, RichText, RichTextProperty, SelectOption, SelectProperty, TitleProperty,
    UrlProperty,
};

pub static DEFAULT_TIMEZONE_OFFSET_SECONDS: i32 = 9 * 3600;
pub static DEFAULT_CHECKLIST_SEPARATOR: &str = "---";
pub static TAG_MARKER: char = '#';

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFieldKind {
    #[default]
    Select,
    RichText,
}

/// How a task is mapped onto the target database
#[serde_as]
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(default)]
pub struct SchemaOptions {
    #[serde_as(as = "DisplayFromStr")]
    pub timezone_offset: FixedOffset,
    pub priority_field: PriorityFieldKind,
    pub checklist_separator: String,
    pub insert_spacer: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            timezone_offset: FixedOffset::east_opt(DEFAULT_TIMEZONE_OFFSET_SECONDS).unwrap(),
            priority_field: PriorityFieldKind::Select,
            checklist_separator: DEFAULT_CHECKLIST_SEPARATOR.to_string(),
            insert_spacer: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageBuilder {
    options: SchemaOptions,
}

impl PageBuilder {
    pub fn new(options: SchemaOptions) -> Self {
        Self { options }
    }

    pub fn build(
        &self,
        task: &TaskRecord,
        database_id: &str,
    ) -> Result<PageCreationRequest, PayloadError> {
        let content = trim_one_newline(&task.task_content);
        let tags = parse_tags(&task.tag);

        let properties = PageProperties {
            task_name: TitleProperty {
                title: RichText::non_empty_runs(&task.task_name),
            },
            task_content: RichTextProperty {
                rich_text: RichText::non_empty_runs(content),
            },
            complete_date: self.build_date("CompleteDate", &task.complete_date)?,
            list: non_empty(&task.list).map(SelectProperty::new),
            priority: non_empty(&task.priority).map(|priority| self.build_priority(priority)),
            link_to_task: non_empty(&task.link_to_task).map(|url| UrlProperty {
                url: url.to_string(),
            }),
            created_at: self.build_date("CreatedAt", &task.created_at)?,
            tag: (!tags.is_empty()).then(|| MultiSelectProperty {
                multi_select: tags.into_iter().map(|name| SelectOption { name }).collect(),
            }),
            start_date: self.build_optional_date("StartDate", &task.start_date)?,
            end_date: self.build_optional_date("EndDate", &task.end_date)?,
        };

        let children = (!content.is_empty())
            .then(|| {
                segment_content(
                    content,
                    &self.options.checklist_separator,
                    self.options.insert_spacer,
                )
            })
            .filter(|blocks| !blocks.is_empty());

        Ok(PageCreationRequest {
            parent: PageParent {
                database_id: database_id.to_string(),
            },
            properties,
            children,
        })
    }

    fn build_date(&self, field: &'static str, value: &str) -> Result<DateProperty, PayloadError> {
        let date: TaskDate = value
            .parse()
            .map_err(|err| PayloadError::MalformedPayload(format!("Invalid `{field}`: {err}")))?;

        Ok(DateProperty::new(
            date.format_with_offset(&self.options.timezone_offset),
        ))
    }

    fn build_optional_date(
        &self,
        field: &'static str,
        value: &str,
    ) -> Result<Option<DateProperty>, PayloadError> {
        non_empty(value)
            .map(|value| self.build_date(field, value))
            .transpose()
    }

    fn build_priority(&self, priority: &str) -> PriorityProperty {
        match self.options.priority_field {
            PriorityFieldKind::Select => PriorityProperty::Select(SelectProperty::new(priority)),
            PriorityFieldKind::RichText => PriorityProperty::RichText(RichTextProperty {
                rich_text: RichText::runs(priority),
            }),
        }
    }
}

/// Split a space separated list of `#tags` into tag names
pub fn parse_tags(tag: &str) -> Vec<String> {
    tag.split(' ')
        .map(|token| token.strip_prefix(TAG_MARKER).unwrap_or(token))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}
