//! Turns log records into Slack messages.

use std::collections::BTreeMap;

use serde::Deserialize;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;
use tracing::Level;

use super::message::{SlackAttachment, SlackMessage};
use crate::logging::redact::redact;

pub const DEFAULT_ATTACHMENT_FORMAT: &str = "%message%";
pub const DEFAULT_TEXT_FORMAT: &str = "%date% *%type%:* %message%";

#[derive(Debug, Clone, Deserialize)]
pub struct FormatterOptions {
    /// Render as a coloured attachment rather than plain text
    #[serde(default = "default_use_attachment")]
    pub use_attachment: bool,
    /// Line format with `%date%`, `%type%` and `%message%` placeholders
    #[serde(default)]
    pub format: Option<String>,
    /// Notify everyone in the channel
    #[serde(default)]
    pub alert_channel: bool,
}

fn default_use_attachment() -> bool {
    true
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            use_attachment: true,
            format: None,
            alert_channel: false,
        }
    }
}

/// A single log event, decoupled from `tracing` internals.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub timestamp: OffsetDateTime,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct SlackFormatter {
    options: FormatterOptions,
}

impl SlackFormatter {
    pub fn new(options: FormatterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    pub fn format(&self, record: &LogRecord) -> SlackMessage {
        if self.options.use_attachment {
            return self.format_as_attachment(record);
        }

        let format = self.options.format.as_deref().unwrap_or(DEFAULT_TEXT_FORMAT);
        let text = self.line(format, record);
        let text = if self.options.alert_channel {
            format!("@channel: {text}")
        } else {
            text
        };

        SlackMessage::text(text)
    }

    fn format_as_attachment(&self, record: &LogRecord) -> SlackMessage {
        let format = self
            .options
            .format
            .as_deref()
            .unwrap_or(DEFAULT_ATTACHMENT_FORMAT);
        let title = type_name(&record.level);
        let text = self.line(format, record);

        let mut message = SlackMessage::default();
        message.attach(SlackAttachment {
            fallback: format!("{title}: {text}"),
            title: title.to_string(),
            text,
            color: level_color(&record.level).to_string(),
            ts: record.timestamp.unix_timestamp(),
        });

        if self.options.alert_channel {
            message.text = Some("@channel".to_string());
        }

        message
    }

    fn line(&self, format: &str, record: &LogRecord) -> String {
        let date = record
            .timestamp
            .format(&Rfc2822)
            .unwrap_or_else(|_| record.timestamp.unix_timestamp().to_string());
        let message = interpolate(&record.message, &record.fields);

        let line = format
            .replace("%date%", &date)
            .replace("%type%", type_name(&record.level))
            .replace("%message%", &message)
            .replace(['\r', '\n'], "");

        redact(&line)
    }
}

/// Replace `{name}` placeholders with event field values.
fn interpolate(message: &str, fields: &BTreeMap<String, String>) -> String {
    fields.iter().fold(message.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

pub fn type_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        _ => "TRACE",
    }
}

pub fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "danger",
        Level::WARN | Level::INFO => "warning",
        Level::DEBUG => "#439FE0",
        _ => "good",
    }
}
