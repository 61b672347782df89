use std::str::FromStr;

use tracing::Level;

use crate::logging::slack::{ClientSettings, FormatterOptions, SlackError};

pub const SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const SLACK_LEVEL: &str = "SLACK_LEVEL";
pub const SLACK_CHANNEL: &str = "SLACK_CHANNEL";
pub const SLACK_USERNAME: &str = "SLACK_USERNAME";
pub const SLACK_ICON: &str = "SLACK_ICON";
pub const SLACK_USE_ATTACHMENT: &str = "SLACK_USE_ATTACHMENT";
pub const SLACK_FORMAT: &str = "SLACK_FORMAT";
pub const SLACK_ALERT_CHANNEL: &str = "SLACK_ALERT_CHANNEL";

#[derive(Debug, Clone)]
pub struct SlackSettings {
    pub webhook_url: String,
    /// Least severe level forwarded
    pub level: Level,
    pub client: ClientSettings,
    pub formatter: FormatterOptions,
}

impl SlackSettings {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            level: Level::ERROR,
            client: ClientSettings::default(),
            formatter: FormatterOptions::default(),
        }
    }

    /// Read settings from `SLACK_*` environment variables.
    ///
    /// Returns `Ok(None)` when no webhook URL is configured, which disables
    /// forwarding entirely.
    pub fn from_env() -> Result<Option<Self>, SlackError> {
        let Some(webhook_url) = env_var(SLACK_WEBHOOK_URL) else {
            return Ok(None);
        };

        let level = match env_var(SLACK_LEVEL) {
            Some(raw) => Level::from_str(raw.trim()).map_err(|_| {
                SlackError::Config(format!("{SLACK_LEVEL} must be a log level, got {raw:?}"))
            })?,
            None => Level::ERROR,
        };

        let defaults = FormatterOptions::default();
        let formatter = FormatterOptions {
            use_attachment: env_flag(SLACK_USE_ATTACHMENT)?.unwrap_or(defaults.use_attachment),
            format: env_var(SLACK_FORMAT),
            alert_channel: env_flag(SLACK_ALERT_CHANNEL)?.unwrap_or(defaults.alert_channel),
        };

        Ok(Some(Self {
            webhook_url,
            level,
            client: ClientSettings {
                channel: env_var(SLACK_CHANNEL),
                username: env_var(SLACK_USERNAME),
                icon_emoji: env_var(SLACK_ICON),
            },
            formatter,
        }))
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> Result<Option<bool>, SlackError> {
    env_var(key).map(|raw| parse_flag(key, &raw)).transpose()
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, SlackError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SlackError::Config(format!(
            "{key} must be a boolean, got {raw:?}"
        ))),
    }
}
