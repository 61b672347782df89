use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::message::SlackMessage;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("Slack configuration error: {0}")]
    Config(String),
    #[error("Slack delivery failed: {0}")]
    Delivery(String),
}

/// Defaults merged into every outgoing message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub icon_emoji: Option<String>,
}

#[async_trait]
pub trait SlackClient: Send + Sync {
    async fn send(&self, message: &SlackMessage) -> Result<(), SlackError>;
}

/// Posts messages to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
    settings: ClientSettings,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, settings: ClientSettings) -> Result<Self, SlackError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(SlackError::Config(
                "A Slack webhook URL is required".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            url,
            settings,
        })
    }

    /// The message with client defaults filled into unset fields.
    pub fn payload(&self, message: &SlackMessage) -> SlackMessage {
        let mut payload = message.clone();
        if payload.channel.is_none() {
            payload.channel = self.settings.channel.clone();
        }
        if payload.username.is_none() {
            payload.username = self.settings.username.clone();
        }
        if payload.icon_emoji.is_none() {
            payload.icon_emoji = self.settings.icon_emoji.clone();
        }
        payload
    }
}

#[async_trait]
impl SlackClient for WebhookClient {
    async fn send(&self, message: &SlackMessage) -> Result<(), SlackError> {
        self.http
            .post(&self.url)
            .json(&self.payload(message))
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| SlackError::Delivery(e.without_url().to_string()))?;
        Ok(())
    }
}
