use super::{PayloadError, TaskPayload, TaskRecord};

static TASK_CONTENT_KEY: &str = "\"TaskContent\"";

impl TaskPayload {
    /// Parse the body sent by a TickTick automation.
    ///
    /// TickTick inserts the task content without escaping its line breaks,
    /// so the `TaskContent` value is repaired before the body is parsed.
    /// Required fields are only checked when converting into a `TaskRecord`.
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        let repaired_payload = repair_task_content(payload)?;
        serde_json::from_str(&repaired_payload)
            .map_err(|err| PayloadError::MalformedPayload(err.to_string()))
    }
}

impl TaskRecord {
    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        TaskPayload::parse(payload)?.try_into()
    }
}

/// Escape raw control characters found in the `TaskContent` string value.
///
/// Line breaks (`\r\n`, `\r` or `\n`) become a single `\n` escape sequence,
/// other control characters a `\u00XX` escape sequence. Escape sequences
/// already present are left untouched.
pub fn repair_task_content(payload: &str) -> Result<String, PayloadError> {
    let value_start = find_task_content_value(payload).ok_or_else(|| {
        PayloadError::MalformedPayload("Cannot find the TaskContent string value".to_string())
    })?;

    let mut repaired_value = String::new();
    let mut value_end = None;
    let mut escaped = false;
    let mut chars = payload[value_start..].char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if escaped {
            repaired_value.push(c);
            escaped = false;
            continue;
        }

        match c {
            '"' => {
                value_end = Some(value_start + index);
                break;
            }
            '\\' => {
                repaired_value.push(c);
                escaped = true;
            }
            '\r' => {
                chars.next_if(|(_, next)| *next == '\n');
                repaired_value.push_str("\\n");
            }
            '\n' => repaired_value.push_str("\\n"),
            c if c.is_control() && (c as u32) < 0x20 => {
                repaired_value.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => repaired_value.push(c),
        }
    }

    let value_end = value_end.ok_or_else(|| {
        PayloadError::MalformedPayload("Unterminated TaskContent string value".to_string())
    })?;

    Ok(format!(
        "{}{}{}",
        &payload[..value_start],
        repaired_value,
        &payload[value_end..]
    ))
}

/// Return the byte offset right after the opening quote of the value
fn find_task_content_value(payload: &str) -> Option<usize> {
    payload
        .match_indices(TASK_CONTENT_KEY)
        .find_map(|(key_start, _)| {
            let after_key = &payload[key_start + TASK_CONTENT_KEY.len()..];
            let after_colon = after_key.trim_start().strip_prefix(':')?;
            let value = after_colon.trim_start().strip_prefix('"')?;
            Some(payload.len() - value.len())
        })
}
