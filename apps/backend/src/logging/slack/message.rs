use serde::Serialize;

/// Incoming-webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlackMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub title: String,
    pub text: String,
    pub color: String,
    /// Unix seconds
    pub ts: i64,
}

impl SlackMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn attach(&mut self, attachment: SlackAttachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }
}
