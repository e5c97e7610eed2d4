//! Turn tasks exported by TickTick automations into Notion database pages.

pub mod notion;
pub mod task;
pub mod utils;
