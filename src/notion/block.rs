use serde::{Deserialize, Serialize};

use super::RichText;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockObject {
    #[default]
    Block,
}

/// A block appended to the body of the created page
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct ContentBlock {
    pub object: BlockObject,
    #[serde(flatten)]
    pub kind: ContentBlockKind,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlockKind {
    Paragraph { paragraph: ParagraphBlock },
    ToDo { to_do: ToDoBlock },
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct ParagraphBlock {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct ToDoBlock {
    pub rich_text: Vec<RichText>,
    pub checked: bool,
}

impl ContentBlock {
    /// An empty `text` gives an empty paragraph
    pub fn paragraph(text: &str) -> Self {
        ContentBlock {
            object: BlockObject::Block,
            kind: ContentBlockKind::Paragraph {
                paragraph: ParagraphBlock {
                    rich_text: RichText::runs(text),
                },
            },
        }
    }

    /// Checklist items are always created as checked: the task they belong
    /// to has been completed.
    pub fn to_do(text: &str) -> Self {
        ContentBlock {
            object: BlockObject::Block,
            kind: ContentBlockKind::ToDo {
                to_do: ToDoBlock {
                    rich_text: RichText::non_empty_runs(text),
                    checked: true,
                },
            },
        }
    }
}

/// Remove at most one leading and one trailing line feed
pub fn trim_one_newline(content: &str) -> &str {
    let content = content.strip_prefix('\n').unwrap_or(content);
    content.strip_suffix('\n').unwrap_or(content)
}

/// Turn an already trimmed task content into page blocks.
///
/// Lines before the first `separator` line are paragraphs, every line after
/// it is a checked checklist item. When both kinds are present and
/// `insert_spacer` is set, an empty paragraph separates them.
pub fn segment_content(content: &str, separator: &str, insert_spacer: bool) -> Vec<ContentBlock> {
    let mut blocks = vec![];
    let mut paragraphs_count = 0;
    let mut in_checklist = false;

    for line in content.split('\n') {
        if in_checklist {
            blocks.push(ContentBlock::to_do(line));
            continue;
        }

        if line == separator {
            in_checklist = true;
            if insert_spacer && paragraphs_count > 0 {
                blocks.push(ContentBlock::paragraph(""));
            }
            continue;
        }

        blocks.push(ContentBlock::paragraph(line));
        paragraphs_count += 1;
    }

    blocks
}
