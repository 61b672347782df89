//! Slack log forwarding.
//!
//! A `tracing` layer formats qualifying events as Slack messages (coloured
//! attachments or plain lines) and a background worker posts them to an
//! incoming webhook.

pub mod client;
pub mod formatter;
pub mod layer;
pub mod message;

pub use client::{ClientSettings, SlackClient, SlackError, WebhookClient};
pub use formatter::{FormatterOptions, LogRecord, SlackFormatter};
pub use layer::{SlackLayer, SlackWorker};
pub use message::{SlackAttachment, SlackMessage};
