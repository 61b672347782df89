use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use session_backend::logging::slack::{SlackClient, SlackError, SlackMessage};

/// Records delivered messages; optionally fails every send.
#[derive(Clone, Default)]
pub struct CaptureClient {
    pub sent: Arc<Mutex<Vec<SlackMessage>>>,
    pub fail: bool,
}

impl CaptureClient {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<SlackMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl SlackClient for CaptureClient {
    async fn send(&self, message: &SlackMessage) -> Result<(), SlackError> {
        self.sent.lock().push(message.clone());
        if self.fail {
            return Err(SlackError::Delivery("webhook returned 500".to_string()));
        }
        Ok(())
    }
}
