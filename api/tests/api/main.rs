#[path = "../common/mod.rs"]
mod common;

mod helpers;
mod test_health_check;
mod test_ticktick_webhook;
