use std::env;

use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use url::Url;

use ticktick_to_notion::notion::SchemaOptions;

use crate::mailer::DEFAULT_SENDER_NAME;

pub static DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
pub static DEFAULT_NOTION_API_VERSION: &str = "2022-06-28";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub notion: NotionSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
    pub notification: NotificationSettings,
    #[serde(default)]
    pub schema: SchemaOptions,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub listen_address: String,
    pub listen_port: u16,
    pub api_path: String,
    pub observability: ObservabilitySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ObservabilitySettings {
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    pub log_directive: String,
    pub dependencies_log_level: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct NotionSettings {
    pub api_token: Secret<String>,
    pub database_id: String,
    pub base_url: Option<Url>,
    pub api_version: Option<String>,
}

impl NotionSettings {
    pub fn api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or(DEFAULT_NOTION_API_VERSION)
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct WebhookSettings {
    pub auth_token: Option<Secret<String>>,
}

impl WebhookSettings {
    /// An empty configured token disables authentication
    pub fn expected_auth_token(&self) -> Option<Secret<String>> {
        self.auth_token
            .as_ref()
            .filter(|token| !token.expose_secret().is_empty())
            .cloned()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct NotificationSettings {
    pub recipient: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    pub from_header: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: Secret<String>,
}

fn default_sender_name() -> String {
    DEFAULT_SENDER_NAME.to_string()
}

impl Settings {
    pub fn new_from_file(file: Option<String>) -> Result<Self, ConfigError> {
        let config_file_required = file.is_some();
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config".into());
        let config_file = file.unwrap_or_else(|| {
            env::var("CONFIG_FILE").unwrap_or_else(|_| format!("{config_path}/dev"))
        });

        let default_config_file = format!("{config_path}/default");
        let local_config_file = format!("{config_path}/local");
        println!(
            "Trying to load {:?} config files",
            vec![&default_config_file, &local_config_file, &config_file]
        );

        let config = Config::builder()
            .add_source(File::with_name(&default_config_file))
            .add_source(File::with_name(&local_config_file).required(false))
            .add_source(File::with_name(&config_file).required(config_file_required))
            .add_source(Environment::with_prefix("ticktick_to_notion").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn new() -> Result<Self, ConfigError> {
        Settings::new_from_file(None)
    }
}
